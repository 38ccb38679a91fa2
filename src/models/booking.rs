use chrono::{DateTime, NaiveDate, Utc};
use futures::future::AbortHandle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::sessions::Session;
use crate::models::{
    pricing::PriceBreakdown, user::LoyaltySummary, wizard::WizardState,
};
use crate::services::two_factor_service::TwoFactorChallenge;

/// The stay a booking session is for, as picked on the hotel page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSelection {
    pub hotel_id: u32,
    pub room_id: u32,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

fn default_adults() -> u32 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    InProgress,
    Processing,
    Confirmed,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrimaryGuest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StayDates {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub nights: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: BookingStatus,
    pub hotel_id: u32,
    pub hotel_name: String,
    pub hotel_address: String,
    pub room_name: String,
    pub dates: StayDates,
    pub adults: u32,
    pub children: u32,
    pub primary_guest: PrimaryGuest,
    pub payment_method: String,
    pub pricing: PriceBreakdown,
    pub loyalty: LoyaltySummary,
    pub created_at: DateTime<Utc>,
}

/// Server-side state for one visit to the booking page.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSession {
    pub id: Uuid,
    pub selection: BookingSelection,
    pub wizard: WizardState,
    pub verification: TwoFactorChallenge,
    pub status: BookingStatus,
    pub confirmation: Option<BookingConfirmation>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub pending: Option<AbortHandle>,
}

impl BookingSession {
    pub fn new(selection: BookingSelection) -> Self {
        Self {
            id: Uuid::new_v4(),
            selection,
            wizard: WizardState::default(),
            verification: TwoFactorChallenge::default(),
            status: BookingStatus::InProgress,
            confirmation: None,
            created_at: Utc::now(),
            pending: None,
        }
    }
}

impl Session for BookingSession {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
