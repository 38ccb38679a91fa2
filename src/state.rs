use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::db::{
    fixtures::{sample_profile, sample_trips, Catalog},
    sessions::SessionStore,
};
use crate::models::{
    booking::BookingSession,
    review::ReviewSession,
    user::{Trip, UserProfile},
};
use crate::services::pricing_service::PricingService;

/// The signed-in traveller. There is exactly one.
pub struct ProfileState {
    pub profile: UserProfile,
    pub trips: Vec<Trip>,
}

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub pricing: PricingService,
    pub bookings: SessionStore<BookingSession>,
    pub reviews: SessionStore<ReviewSession>,
    profile: Mutex<ProfileState>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            pricing: PricingService::new(config.pricing.clone()),
            catalog: Catalog::fixture(),
            bookings: SessionStore::new(config.session_ttl),
            reviews: SessionStore::new(config.session_ttl),
            config,
            profile: Mutex::new(ProfileState {
                profile: sample_profile(),
                trips: sample_trips(),
            }),
        }
    }

    pub fn profile(&self) -> MutexGuard<'_, ProfileState> {
        self.profile.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
