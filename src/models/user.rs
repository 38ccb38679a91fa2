use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::currency::Currency;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub member_since: String,
    pub loyalty_points: u64,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: [Language; 9] = [
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Español" },
    Language { code: "fr", name: "Français" },
    Language { code: "de", name: "Deutsch" },
    Language { code: "it", name: "Italiano" },
    Language { code: "pt", name: "Português" },
    Language { code: "ja", name: "日本語" },
    Language { code: "ko", name: "한국어" },
    Language { code: "zh", name: "中文" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: TripStatus,
    pub booking_reference: String,
    pub total_amount: Decimal,
    pub currency: Currency,
    pub hotel_name: String,
    pub room_type: String,
    pub guests: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyTier {
    pub name: &'static str,
    pub min_points: u64,
    /// `None` for the top tier.
    pub max_points: Option<u64>,
    pub benefits: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyProgress {
    pub points: u64,
    pub tier: LoyaltyTier,
    pub next_tier: Option<LoyaltyTier>,
    pub progress_percent: Decimal,
    pub points_to_next: u64,
}

/// Loyalty outcome of a completed booking.
#[derive(Debug, Clone, Serialize)]
pub struct LoyaltySummary {
    pub earned: u64,
    pub previous_balance: u64,
    pub new_balance: u64,
    pub tier: &'static str,
    pub next_tier: Option<&'static str>,
    pub points_to_next_tier: u64,
}
