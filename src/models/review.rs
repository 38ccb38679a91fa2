use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::db::sessions::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingCategory {
    Cleanliness,
    Service,
    Location,
    Value,
    Amenities,
    Comfort,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 6] = [
        RatingCategory::Cleanliness,
        RatingCategory::Service,
        RatingCategory::Location,
        RatingCategory::Value,
        RatingCategory::Amenities,
        RatingCategory::Comfort,
    ];
}

pub const RATING_LABELS: [&str; 5] = ["Poor", "Fair", "Good", "Very Good", "Excellent"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMeta {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub overall_rating: u8,
    pub category_ratings: BTreeMap<RatingCategory, u8>,
    pub title: String,
    pub feedback: String,
    pub photos: Vec<PhotoMeta>,
    pub would_recommend: Option<bool>,
    pub trip_type: String,
    pub room_type: String,
    pub stay_duration: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            overall_rating: 0,
            category_ratings: RatingCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            title: String::new(),
            feedback: String::new(),
            photos: Vec::new(),
            would_recommend: None,
            trip_type: String::new(),
            room_type: String::new(),
            stay_duration: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewSession {
    pub id: Uuid,
    pub booking_id: String,
    pub hotel_id: u32,
    pub draft: ReviewDraft,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ReviewSession {
    pub fn new(booking_id: String, hotel_id: u32, room_name: Option<String>) -> Self {
        let draft = ReviewDraft {
            room_type: room_name.unwrap_or_default(),
            ..ReviewDraft::default()
        };

        Self {
            id: Uuid::new_v4(),
            booking_id,
            hotel_id,
            draft,
            status: ReviewStatus::Draft,
            created_at: Utc::now(),
            submitted_at: None,
        }
    }
}

impl Session for ReviewSession {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
