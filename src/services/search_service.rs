use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::catalog::{Hotel, HotelSummary, PropertyType};

pub const HOTELS_PER_PAGE: usize = 4;
pub const DEFAULT_MAX_PRICE: Decimal = dec!(1000);
pub const DEFAULT_MAX_DISTANCE_KM: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Recommended,
    PriceLow,
    PriceHigh,
    Rating,
    Distance,
}

#[derive(Debug, PartialEq)]
pub enum SearchError {
    UnknownPropertyType(String),
    InvalidPriceRange,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::UnknownPropertyType(value) => {
                write!(f, "Unknown property type '{}'", value)
            }
            SearchError::InvalidPriceRange => {
                write!(f, "min_price must not be greater than max_price")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Query string of the search page. List values are comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f32>,
    pub amenities: Option<String>,
    pub property_types: Option<String>,
    pub max_distance: Option<f32>,
    pub sort: SortOrder,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub min_rating: f32,
    pub amenities: Vec<String>,
    pub property_types: Vec<PropertyType>,
    pub max_distance_km: f32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            min_price: Decimal::ZERO,
            max_price: DEFAULT_MAX_PRICE,
            min_rating: 0.0,
            amenities: Vec::new(),
            property_types: Vec::new(),
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub hotels: Vec<HotelSummary>,
    pub total_results: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub sort: SortOrder,
    pub active_filters: usize,
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_property_type(value: &str) -> Result<PropertyType, SearchError> {
    match value.to_ascii_lowercase().as_str() {
        "hotel" => Ok(PropertyType::Hotel),
        "apartment" => Ok(PropertyType::Apartment),
        "resort" => Ok(PropertyType::Resort),
        "villa" => Ok(PropertyType::Villa),
        _ => Err(SearchError::UnknownPropertyType(value.to_string())),
    }
}

impl SearchQuery {
    pub fn filters(&self) -> Result<SearchFilters, SearchError> {
        let defaults = SearchFilters::default();
        let min_price = self.min_price.unwrap_or(defaults.min_price);
        let max_price = self.max_price.unwrap_or(defaults.max_price);
        if min_price > max_price {
            return Err(SearchError::InvalidPriceRange);
        }

        let property_types = split_list(self.property_types.as_deref())
            .map(parse_property_type)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchFilters {
            min_price,
            max_price,
            min_rating: self.min_rating.unwrap_or(defaults.min_rating),
            amenities: split_list(self.amenities.as_deref())
                .map(str::to_ascii_lowercase)
                .collect(),
            property_types,
            max_distance_km: self.max_distance.unwrap_or(defaults.max_distance_km),
        })
    }
}

impl SearchFilters {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        hotel.price >= self.min_price
            && hotel.price <= self.max_price
            && hotel.rating >= self.min_rating
            && hotel.distance_km <= self.max_distance_km
            && self.amenities.iter().all(|a| hotel.amenities.contains(a))
            && (self.property_types.is_empty()
                || self.property_types.contains(&hotel.property_type))
    }

    /// Number of filters narrowed from their defaults, as counted by the
    /// sidebar badge.
    pub fn active_count(&self) -> usize {
        let defaults = SearchFilters::default();
        [
            self.min_price != defaults.min_price || self.max_price != defaults.max_price,
            self.min_rating > 0.0,
            !self.amenities.is_empty(),
            !self.property_types.is_empty(),
            self.max_distance_km < defaults.max_distance_km,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

fn compare(order: SortOrder, a: &Hotel, b: &Hotel) -> Ordering {
    match order {
        SortOrder::Recommended => b
            .featured
            .cmp(&a.featured)
            .then_with(|| b.rating.total_cmp(&a.rating)),
        SortOrder::PriceLow => a.price.cmp(&b.price),
        SortOrder::PriceHigh => b.price.cmp(&a.price),
        SortOrder::Rating => b.rating.total_cmp(&a.rating),
        SortOrder::Distance => a.distance_km.total_cmp(&b.distance_km),
    }
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(HOTELS_PER_PAGE)
}

pub struct SearchService;

impl SearchService {
    /// Filters, sorts, then cuts out the requested 1-based page. Pages past
    /// the end come back empty.
    pub fn search(
        hotels: &[Hotel],
        filters: &SearchFilters,
        sort: SortOrder,
        page: usize,
    ) -> SearchResults {
        let mut matched: Vec<&Hotel> =
            hotels.iter().filter(|hotel| filters.matches(hotel)).collect();
        matched.sort_by(|a, b| compare(sort, a, b).then_with(|| a.id.cmp(&b.id)));

        let page = page.max(1);
        let total_results = matched.len();
        let page_hotels = matched
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(HOTELS_PER_PAGE))
            .take(HOTELS_PER_PAGE)
            .map(HotelSummary::from)
            .collect();

        log::debug!(
            "Search matched {} hotels ({} active filters), page {}",
            total_results,
            filters.active_count(),
            page
        );

        SearchResults {
            hotels: page_hotels,
            total_results,
            page,
            per_page: HOTELS_PER_PAGE,
            total_pages: total_pages(total_results),
            sort,
            active_filters: filters.active_count(),
        }
    }
}
