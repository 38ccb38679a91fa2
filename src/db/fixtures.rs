use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    catalog::{Coordinates, Hotel, PropertyType, Room},
    currency::Currency,
    user::{Trip, TripStatus, UserProfile},
};

/// Read-only hotel catalogue served by the API.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub hotels: Vec<Hotel>,
}

impl Catalog {
    pub fn hotel(&self, id: u32) -> Option<&Hotel> {
        self.hotels.iter().find(|h| h.id == id)
    }

    pub fn fixture() -> Self {
        Self {
            hotels: vec![
                grand_palace(),
                Hotel {
                    id: 2,
                    name: "Boutique Riverside Inn".to_string(),
                    location: "Seine Riverbank".to_string(),
                    address: "18 Quai de la Tournelle, 75005 Paris, France".to_string(),
                    rating: 4.6,
                    reviews: 892,
                    price: dec!(165),
                    original_price: None,
                    distance_km: 1.2,
                    amenities: ids(&["wifi", "restaurant", "bar", "terrace"]),
                    property_type: PropertyType::Hotel,
                    featured: false,
                    coordinates: Coordinates { lat: 48.8606, lng: 2.3376 },
                    description: "Charming boutique hotel with river views and modern amenities"
                        .to_string(),
                    phone: "+33 1 43 54 22 18".to_string(),
                    email: "stay@riversideinn.fr".to_string(),
                    rooms: vec![
                        room(
                            1,
                            "Classic Double",
                            "22 m²",
                            "2 guests",
                            "1 Queen Bed",
                            dec!(165),
                            None,
                        ),
                        room(
                            2,
                            "River View Room",
                            "28 m²",
                            "2 guests",
                            "1 King Bed",
                            dec!(210),
                            None,
                        ),
                    ],
                },
                Hotel {
                    id: 3,
                    name: "Modern City Suites".to_string(),
                    location: "Business District".to_string(),
                    address: "7 Avenue de la Grande Armée, 75017 Paris, France".to_string(),
                    rating: 4.4,
                    reviews: 634,
                    price: dec!(195),
                    original_price: None,
                    distance_km: 2.1,
                    amenities: ids(&["wifi", "gym", "business-center", "parking"]),
                    property_type: PropertyType::Apartment,
                    featured: false,
                    coordinates: Coordinates { lat: 48.8738, lng: 2.2950 },
                    description: "Contemporary suites perfect for business and leisure travelers"
                        .to_string(),
                    phone: "+33 1 45 00 31 07".to_string(),
                    email: "hello@moderncitysuites.com".to_string(),
                    rooms: vec![
                        room(
                            1,
                            "Studio Suite",
                            "30 m²",
                            "2 guests",
                            "1 Queen Bed",
                            dec!(195),
                            None,
                        ),
                        room(
                            2,
                            "One Bedroom Suite",
                            "48 m²",
                            "3 guests",
                            "1 King Bed + Sofa Bed",
                            dec!(260),
                            None,
                        ),
                    ],
                },
                Hotel {
                    id: 4,
                    name: "Historic Château Resort".to_string(),
                    location: "Versailles".to_string(),
                    address: "2 Boulevard de la Reine, 78000 Versailles, France".to_string(),
                    rating: 4.9,
                    reviews: 456,
                    price: dec!(450),
                    original_price: Some(dec!(520)),
                    distance_km: 15.5,
                    amenities: ids(&["wifi", "pool", "spa", "restaurant", "golf", "gardens"]),
                    property_type: PropertyType::Resort,
                    featured: true,
                    coordinates: Coordinates { lat: 48.8049, lng: 2.1204 },
                    description: "Magnificent château hotel with extensive grounds and luxury amenities"
                        .to_string(),
                    phone: "+33 1 39 84 50 00".to_string(),
                    email: "reservations@chateauresort.fr".to_string(),
                    rooms: vec![
                        room(
                            1,
                            "Garden Room",
                            "40 m²",
                            "2 guests",
                            "1 King Bed",
                            dec!(450),
                            Some(dec!(520)),
                        ),
                        room(
                            2,
                            "Royal Suite",
                            "90 m²",
                            "4 guests",
                            "2 King Beds",
                            dec!(890),
                            Some(dec!(980)),
                        ),
                    ],
                },
                Hotel {
                    id: 5,
                    name: "Cozy Garden Hotel".to_string(),
                    location: "Montmartre".to_string(),
                    address: "24 Rue Lepic, 75018 Paris, France".to_string(),
                    rating: 4.3,
                    reviews: 789,
                    price: dec!(125),
                    original_price: None,
                    distance_km: 3.2,
                    amenities: ids(&["wifi", "garden", "restaurant", "pets"]),
                    property_type: PropertyType::Hotel,
                    featured: false,
                    coordinates: Coordinates { lat: 48.8867, lng: 2.3431 },
                    description: "Intimate hotel with beautiful garden courtyard in artistic Montmartre"
                        .to_string(),
                    phone: "+33 1 46 06 72 85".to_string(),
                    email: "contact@cozygardenhotel.fr".to_string(),
                    rooms: vec![room(
                        1,
                        "Garden Double",
                        "18 m²",
                        "2 guests",
                        "1 Double Bed",
                        dec!(125),
                        None,
                    )],
                },
                Hotel {
                    id: 6,
                    name: "Executive Business Hotel".to_string(),
                    location: "La Défense".to_string(),
                    address: "5 Place de la Défense, 92400 Courbevoie, France".to_string(),
                    rating: 4.5,
                    reviews: 1123,
                    price: dec!(220),
                    original_price: None,
                    distance_km: 1.8,
                    amenities: ids(&["wifi", "gym", "business-center", "restaurant", "bar"]),
                    property_type: PropertyType::Hotel,
                    featured: false,
                    coordinates: Coordinates { lat: 48.8922, lng: 2.2358 },
                    description: "Premium business hotel with state-of-the-art facilities"
                        .to_string(),
                    phone: "+33 1 47 17 50 00".to_string(),
                    email: "frontdesk@executivebusiness.com".to_string(),
                    rooms: vec![
                        room(
                            1,
                            "Business King",
                            "26 m²",
                            "2 guests",
                            "1 King Bed",
                            dec!(220),
                            None,
                        ),
                        room(
                            2,
                            "Executive Club Room",
                            "34 m²",
                            "2 guests",
                            "1 King Bed",
                            dec!(295),
                            None,
                        ),
                    ],
                },
            ],
        }
    }
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn room(
    id: u32,
    name: &str,
    size: &str,
    occupancy: &str,
    beds: &str,
    price: Decimal,
    original_price: Option<Decimal>,
) -> Room {
    Room {
        id,
        name: name.to_string(),
        size: size.to_string(),
        occupancy: occupancy.to_string(),
        beds: beds.to_string(),
        price,
        original_price,
        amenities: ids(&["Free WiFi", "Air Conditioning"]),
        description: format!("{} with {}.", name, beds.to_lowercase()),
    }
}

fn grand_palace() -> Hotel {
    Hotel {
        id: 1,
        name: "Grand Palace Hotel".to_string(),
        location: "Downtown Paris".to_string(),
        address: "123 Champs-Élysées, 75008 Paris, France".to_string(),
        rating: 4.8,
        reviews: 1247,
        price: dec!(285),
        original_price: Some(dec!(320)),
        distance_km: 0.8,
        amenities: ids(&["wifi", "pool", "spa", "restaurant", "gym", "parking", "bar"]),
        property_type: PropertyType::Hotel,
        featured: true,
        coordinates: Coordinates { lat: 48.8566, lng: 2.3522 },
        description: "Experience luxury in the heart of Paris at the Grand Palace Hotel. Our elegant \
                      accommodations offer stunning city views, world-class amenities, and unparalleled service."
            .to_string(),
        phone: "+33 1 42 86 10 10".to_string(),
        email: "reservations@grandpalace.com".to_string(),
        rooms: vec![
            Room {
                id: 1,
                name: "Deluxe City View".to_string(),
                size: "35 m²".to_string(),
                occupancy: "2 guests".to_string(),
                beds: "1 King Bed".to_string(),
                price: dec!(285),
                original_price: Some(dec!(320)),
                amenities: ids(&["City View", "Free WiFi", "Air Conditioning", "Minibar", "Safe"]),
                description: "Elegant room with panoramic city views and modern amenities."
                    .to_string(),
            },
            Room {
                id: 2,
                name: "Executive Suite".to_string(),
                size: "65 m²".to_string(),
                occupancy: "4 guests".to_string(),
                beds: "1 King Bed + Sofa Bed".to_string(),
                price: dec!(485),
                original_price: Some(dec!(550)),
                amenities: ids(&[
                    "Separate Living Area",
                    "Executive Lounge Access",
                    "Free WiFi",
                    "Kitchenette",
                    "Balcony",
                ]),
                description: "Spacious suite with separate living area and executive privileges."
                    .to_string(),
            },
            Room {
                id: 3,
                name: "Presidential Suite".to_string(),
                size: "120 m²".to_string(),
                occupancy: "6 guests".to_string(),
                beds: "2 King Beds".to_string(),
                price: dec!(1200),
                original_price: None,
                amenities: ids(&[
                    "Panoramic Views",
                    "Private Terrace",
                    "Butler Service",
                    "Jacuzzi",
                    "Dining Room",
                ]),
                description: "Ultimate luxury with private terrace and personalized service."
                    .to_string(),
            },
        ],
    }
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        id: "1".to_string(),
        name: "Sarah Johnson".to_string(),
        email: "sarah.johnson@email.com".to_string(),
        phone: Some("+1 (555) 123-4567".to_string()),
        member_since: "March 2020".to_string(),
        loyalty_points: 8750,
        language: "en".to_string(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn sample_trips() -> Vec<Trip> {
    vec![
        Trip {
            id: "1".to_string(),
            destination: "Paris, France".to_string(),
            departure_date: date(2024, 12, 15),
            return_date: date(2024, 12, 22),
            status: TripStatus::Upcoming,
            booking_reference: "PF2024001".to_string(),
            total_amount: dec!(2850),
            currency: Currency::Usd,
            hotel_name: "Hotel des Grands Boulevards".to_string(),
            room_type: "Deluxe Suite".to_string(),
            guests: 2,
        },
        Trip {
            id: "2".to_string(),
            destination: "Tokyo, Japan".to_string(),
            departure_date: date(2024, 3, 10),
            return_date: date(2024, 3, 17),
            status: TripStatus::Completed,
            booking_reference: "TJ2024002".to_string(),
            total_amount: dec!(3200),
            currency: Currency::Usd,
            hotel_name: "Park Hyatt Tokyo".to_string(),
            room_type: "City View Room".to_string(),
            guests: 1,
        },
        Trip {
            id: "3".to_string(),
            destination: "Santorini, Greece".to_string(),
            departure_date: date(2024, 8, 5),
            return_date: date(2024, 8, 12),
            status: TripStatus::Completed,
            booking_reference: "SG2024003".to_string(),
            total_amount: dec!(2100),
            currency: Currency::Usd,
            hotel_name: "Canaves Oia Suites".to_string(),
            room_type: "Infinity Pool Suite".to_string(),
            guests: 2,
        },
    ]
}
