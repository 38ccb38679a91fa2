use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::user::{Language, ProfileUpdate, TripStatus, UserProfile, LANGUAGES};
use crate::routes::error::ApiError;
use crate::services::{
    loyalty_service::LoyaltyService,
    validation::{is_valid_email, is_valid_phone, INVALID_EMAIL, INVALID_PHONE},
};
use crate::state::AppState;

#[derive(Serialize)]
struct ProfileView {
    #[serde(flatten)]
    profile: UserProfile,
    loyalty_tier: &'static str,
    languages: &'static [Language],
}

impl From<UserProfile> for ProfileView {
    fn from(profile: UserProfile) -> Self {
        Self {
            loyalty_tier: LoyaltyService::tier_for(profile.loyalty_points).name,
            languages: &LANGUAGES,
            profile,
        }
    }
}

#[derive(Deserialize)]
pub struct LanguageRequest {
    language: String,
}

#[derive(Deserialize)]
pub struct TripsQuery {
    status: Option<TripStatus>,
}

// GET /api/profile
pub async fn get_profile(state: web::Data<AppState>) -> HttpResponse {
    let profile = state.profile().profile.clone();
    HttpResponse::Ok().json(ProfileView::from(profile))
}

// PUT /api/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    input: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    let update = input.into_inner();

    let name = update.name.map(|name| name.trim().to_string());
    if matches!(&name, Some(name) if name.is_empty()) {
        return Err(ApiError::bad_request("invalid_profile", "Name cannot be empty"));
    }
    let email = update.email.map(|email| email.trim().to_string());
    if matches!(&email, Some(email) if !is_valid_email(email)) {
        return Err(ApiError::bad_request("invalid_profile", INVALID_EMAIL));
    }
    // An empty phone clears it.
    let phone = update.phone.map(|phone| phone.trim().to_string());
    if matches!(&phone, Some(phone) if !phone.is_empty() && !is_valid_phone(phone)) {
        return Err(ApiError::bad_request("invalid_profile", INVALID_PHONE));
    }

    let mut state_profile = state.profile();
    let profile = &mut state_profile.profile;
    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(email) = email {
        profile.email = email;
    }
    if let Some(phone) = phone {
        profile.phone = Some(phone).filter(|p| !p.is_empty());
    }
    log::info!("Updated profile {}", profile.id);

    Ok(HttpResponse::Ok().json(ProfileView::from(profile.clone())))
}

// PUT /api/profile/language
pub async fn update_language(
    state: web::Data<AppState>,
    input: web::Json<LanguageRequest>,
) -> Result<HttpResponse, ApiError> {
    let code = input.language.trim();
    let Some(language) = LANGUAGES.iter().find(|l| l.code == code) else {
        return Err(ApiError::bad_request(
            "unknown_language",
            format!("Unsupported language '{}'", code),
        ));
    };

    let mut state_profile = state.profile();
    state_profile.profile.language = language.code.to_string();
    Ok(HttpResponse::Ok().json(ProfileView::from(state_profile.profile.clone())))
}

// GET /api/profile/trips
pub async fn list_trips(state: web::Data<AppState>, query: web::Query<TripsQuery>) -> HttpResponse {
    let state_profile = state.profile();
    let trips: Vec<_> = state_profile
        .trips
        .iter()
        .filter(|trip| query.status.map_or(true, |status| trip.status == status))
        .cloned()
        .collect();
    HttpResponse::Ok().json(trips)
}

// GET /api/profile/loyalty
pub async fn get_loyalty(state: web::Data<AppState>) -> HttpResponse {
    let points = state.profile().profile.loyalty_points;
    HttpResponse::Ok().json(LoyaltyService::progress(points))
}
