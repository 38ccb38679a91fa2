use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::review::{PhotoMeta, RatingCategory, ReviewSession, ReviewStatus};
use crate::routes::error::ApiError;
use crate::services::review_service::{
    rating_label, CompletionChecklist, FeedbackUpdate, RatingsUpdate, ReviewService,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    booking_id: String,
    hotel_id: u32,
    room_type: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    session: ReviewSession,
    complete: bool,
    checklist: CompletionChecklist,
    overall_label: Option<&'static str>,
    category_labels: Vec<(RatingCategory, Option<&'static str>)>,
}

impl From<ReviewSession> for ReviewView {
    fn from(session: ReviewSession) -> Self {
        let draft = &session.draft;
        Self {
            complete: ReviewService::is_complete(draft),
            checklist: ReviewService::checklist(draft),
            overall_label: rating_label(draft.overall_rating),
            category_labels: draft
                .category_ratings
                .iter()
                .map(|(category, rating)| (*category, rating_label(*rating)))
                .collect(),
            session,
        }
    }
}

fn view(session: &ReviewSession) -> HttpResponse {
    HttpResponse::Ok().json(ReviewView::from(session.clone()))
}

/// Runs `f` on a draft that can still be edited.
fn edit<R>(
    state: &AppState,
    id: &Uuid,
    f: impl FnOnce(&mut ReviewSession) -> Result<R, ApiError>,
) -> Result<R, ApiError> {
    state
        .reviews
        .with(id, |session| {
            ReviewService::ensure_editable(session)?;
            f(session)
        })
        .ok_or_else(ApiError::review_not_found)?
}

// POST /api/reviews
pub async fn create_review(
    state: web::Data<AppState>,
    input: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();
    if state.catalog.hotel(request.hotel_id).is_none() {
        return Err(ApiError::not_found(
            "hotel_not_found",
            format!("Hotel {} not found", request.hotel_id),
        ));
    }

    let session = ReviewSession::new(request.booking_id, request.hotel_id, request.room_type);
    log::info!("Opened review draft {} for booking {}", session.id, session.booking_id);
    state.reviews.insert(session.id, session.clone());

    Ok(HttpResponse::Created().json(ReviewView::from(session)))
}

// GET /api/reviews/{id}
pub async fn get_review(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.reviews.get(&path).ok_or_else(ApiError::review_not_found)?;
    Ok(view(&session))
}

// DELETE /api/reviews/{id}
pub async fn delete_review(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.reviews.remove(&path).ok_or_else(ApiError::review_not_found)?;
    log::info!("Discarded review draft {}", session.id);
    Ok(HttpResponse::NoContent().finish())
}

// PUT /api/reviews/{id}/ratings
pub async fn update_ratings(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<RatingsUpdate>,
) -> Result<HttpResponse, ApiError> {
    edit(&state, &path, |session| {
        ReviewService::apply_ratings(&mut session.draft, &input)?;
        Ok(view(session))
    })
}

// PUT /api/reviews/{id}/feedback
pub async fn update_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<FeedbackUpdate>,
) -> Result<HttpResponse, ApiError> {
    let update = input.into_inner();
    edit(&state, &path, |session| {
        ReviewService::apply_feedback(&mut session.draft, update)?;
        Ok(view(session))
    })
}

#[derive(Serialize)]
struct PhotoUploadResponse {
    added: Vec<PhotoMeta>,
    errors: Vec<String>,
    photo_count: usize,
}

// POST /api/reviews/{id}/photos
pub async fn upload_photos(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    edit(&state, &id, |_| Ok(()))?;

    // Only the size of each file is kept; the bytes are read and dropped.
    let mut photos = Vec::new();
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::bad_request("invalid_upload", e.to_string()))?
    {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("photo")
            .to_string();
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let mut size_bytes: u64 = 0;
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::bad_request("invalid_upload", e.to_string()))?
        {
            size_bytes += chunk.len() as u64;
        }

        photos.push(PhotoMeta {
            name,
            content_type,
            size_bytes,
        });
    }

    edit(&state, &id, |session| {
        let report = ReviewService::add_photos(&mut session.draft, photos);
        for error in &report.errors {
            log::debug!("Review draft {} rejected a photo: {}", id, error);
        }
        Ok(HttpResponse::Ok().json(PhotoUploadResponse {
            added: report.added,
            errors: report.errors,
            photo_count: session.draft.photos.len(),
        }))
    })
}

// DELETE /api/reviews/{id}/photos/{index}
pub async fn remove_photo(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, usize)>,
) -> Result<HttpResponse, ApiError> {
    let (id, index) = path.into_inner();
    edit(&state, &id, |session| {
        ReviewService::remove_photo(&mut session.draft, index)?;
        Ok(view(session))
    })
}

// POST /api/reviews/{id}/submit
pub async fn submit_review(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state
        .reviews
        .with(&id, ReviewService::begin_submit)
        .ok_or_else(ApiError::review_not_found)??;

    if let Err(e) = state.config.delays.submit_review_task().run().await {
        state.reviews.with(&id, |session| session.status = ReviewStatus::Draft);
        log::warn!("Review {} was not submitted: {}", id, e);
        return Err(e.into());
    }

    let session = state
        .reviews
        .with(&id, |session| {
            session.status = ReviewStatus::Submitted;
            session.submitted_at = Some(Utc::now());
            session.clone()
        })
        .ok_or_else(ApiError::review_not_found)?;
    log::info!("Submitted review {} for hotel {}", id, session.hotel_id);

    Ok(view(&session))
}
