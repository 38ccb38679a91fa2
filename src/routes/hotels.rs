use actix_web::{web, HttpResponse};

use crate::routes::error::ApiError;
use crate::services::search_service::{SearchQuery, SearchService};
use crate::state::AppState;

// GET /api/hotels
pub async fn search_hotels(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let filters = query.filters()?;
    let results = SearchService::search(
        &state.catalog.hotels,
        &filters,
        query.sort,
        query.page.unwrap_or(1),
    );
    Ok(HttpResponse::Ok().json(results))
}

// GET /api/hotels/{id}
pub async fn get_hotel(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match state.catalog.hotel(id) {
        Some(hotel) => Ok(HttpResponse::Ok().json(hotel)),
        None => Err(ApiError::not_found("hotel_not_found", format!("Hotel {} not found", id))),
    }
}
