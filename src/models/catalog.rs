use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Hotel,
    Apartment,
    Resort,
    Villa,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub size: String,
    pub occupancy: String,
    pub beds: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub amenities: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub address: String,
    pub rating: f32,
    pub reviews: u32,
    /// Lowest nightly rate across the hotel's rooms, in USD.
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub distance_km: f32,
    /// Amenity ids, matching the search filter ids (`wifi`, `pool`, ...).
    pub amenities: Vec<String>,
    pub property_type: PropertyType,
    pub featured: bool,
    pub coordinates: Coordinates,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub rooms: Vec<Room>,
}

impl Hotel {
    pub fn room(&self, room_id: u32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }
}

/// Listing card shape for search results; rooms are left out.
#[derive(Debug, Clone, Serialize)]
pub struct HotelSummary {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub rating: f32,
    pub reviews: u32,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub distance_km: f32,
    pub amenities: Vec<String>,
    pub property_type: PropertyType,
    pub featured: bool,
    pub coordinates: Coordinates,
    pub description: String,
}

impl From<&Hotel> for HotelSummary {
    fn from(hotel: &Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name.clone(),
            location: hotel.location.clone(),
            rating: hotel.rating,
            reviews: hotel.reviews,
            price: hotel.price,
            original_price: hotel.original_price,
            distance_km: hotel.distance_km,
            amenities: hotel.amenities.clone(),
            property_type: hotel.property_type,
            featured: hotel.featured,
            coordinates: hotel.coordinates,
            description: hotel.description.clone(),
        }
    }
}
