use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{
    booking::{BookingSelection, BookingSession, BookingStatus},
    currency::Currency,
    wizard::{GuestInfo, PaymentMethod, PolicyId, WizardStep},
};
use crate::routes::error::ApiError;
use crate::services::{
    booking_service::{generate_booking_id, BookingService},
    calendar_service::{ics_filename, CalendarTarget},
    payment_service::CardDetails,
    simulated_task::TaskError,
    two_factor_service::{format_countdown, mask_email, mask_phone, VerificationMethod},
    wizard_service::WizardService,
};
use crate::state::AppState;

/// A booking session plus what the page derives from it.
#[derive(Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    session: BookingSession,
    can_proceed: bool,
    primary_action: &'static str,
    missing_fields: Vec<&'static str>,
    field_errors: BTreeMap<&'static str, &'static str>,
    verification_seconds_left: i64,
    verification_countdown: String,
}

impl From<BookingSession> for BookingView {
    fn from(session: BookingSession) -> Self {
        let step = session.wizard.current_step;
        let seconds_left = session.verification.seconds_left(Utc::now());
        let missing_fields = if step == WizardStep::GuestInfo {
            WizardService::missing_guest_fields(&session.wizard.guest_info)
        } else {
            Vec::new()
        };

        Self {
            can_proceed: WizardService::can_proceed(step, &session.wizard),
            primary_action: WizardService::primary_action_label(step),
            missing_fields,
            field_errors: WizardService::guest_info_errors(&session.wizard.guest_info),
            verification_seconds_left: seconds_left,
            verification_countdown: format_countdown(seconds_left),
            session,
        }
    }
}

#[derive(Deserialize)]
pub struct PaymentMethodRequest {
    #[serde(default)]
    method: String,
    card: Option<CardDetails>,
}

#[derive(Deserialize)]
pub struct CurrencyRequest {
    currency: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SendCodeRequest {
    method: VerificationMethod,
}

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    code: String,
}

#[derive(Deserialize)]
pub struct PolicyRequest {
    accepted: bool,
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    target: Option<String>,
}

#[derive(Serialize)]
struct CodeSent {
    method: VerificationMethod,
    sent_to: String,
    expires_in: i64,
    countdown: String,
}

#[derive(Serialize)]
struct CalendarLink {
    target: String,
    url: String,
}

/// Runs `f` on the session under the store lock.
fn edit<R>(
    state: &AppState,
    id: &Uuid,
    f: impl FnOnce(&mut BookingSession) -> Result<R, ApiError>,
) -> Result<R, ApiError> {
    state
        .bookings
        .with(id, f)
        .ok_or_else(ApiError::booking_not_found)?
}

/// Like [`edit`], for changes only allowed while the wizard is open on `step`.
fn edit_step<R>(
    state: &AppState,
    id: &Uuid,
    step: WizardStep,
    f: impl FnOnce(&mut BookingSession) -> Result<R, ApiError>,
) -> Result<R, ApiError> {
    edit(state, id, |session| {
        BookingService::ensure_editable(session)?;
        WizardService::require_step(&session.wizard, step)?;
        f(session)
    })
}

fn view(session: &BookingSession) -> HttpResponse {
    HttpResponse::Ok().json(BookingView::from(session.clone()))
}

// POST /api/bookings
pub async fn create_booking(
    state: web::Data<AppState>,
    input: web::Json<BookingSelection>,
) -> Result<HttpResponse, ApiError> {
    let selection = input.into_inner();
    BookingService::validate_selection(&state.catalog, &selection)?;

    let session = BookingSession::new(selection);
    log::info!(
        "Opened booking session {} for hotel {} room {}",
        session.id,
        session.selection.hotel_id,
        session.selection.room_id
    );
    state.bookings.insert(session.id, session.clone());

    Ok(HttpResponse::Created().json(BookingView::from(session)))
}

// GET /api/bookings/{id}
pub async fn get_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.bookings.get(&path).ok_or_else(ApiError::booking_not_found)?;
    Ok(view(&session))
}

// DELETE /api/bookings/{id}
pub async fn delete_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.bookings.remove(&path).ok_or_else(ApiError::booking_not_found)?;
    if let Some(handle) = session.pending {
        handle.abort();
    }
    log::info!("Closed booking session {}", session.id);
    Ok(HttpResponse::NoContent().finish())
}

// PUT /api/bookings/{id}/guest-info
pub async fn update_guest_info(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<GuestInfo>,
) -> Result<HttpResponse, ApiError> {
    let guest_info = input.into_inner();
    edit_step(&state, &path, WizardStep::GuestInfo, |session| {
        session.wizard.guest_info = guest_info;
        Ok(view(session))
    })
}

// PUT /api/bookings/{id}/payment-method
pub async fn update_payment_method(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<PaymentMethodRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();
    let method = match request.method.trim() {
        "" => None,
        id => Some(id.parse::<PaymentMethod>()?),
    };
    let card = match method {
        Some(PaymentMethod::Card) => request.card.map(|details| details.summarize()),
        _ => None,
    };

    edit_step(&state, &path, WizardStep::Payment, |session| {
        session.wizard.payment_method = method;
        session.wizard.card = card;
        Ok(view(session))
    })
}

// PUT /api/bookings/{id}/currency
pub async fn update_currency(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<CurrencyRequest>,
) -> Result<HttpResponse, ApiError> {
    let currency: Currency = input.currency.parse()?;
    edit(&state, &path, |session| {
        BookingService::ensure_editable(session)?;
        session.wizard.currency = currency;
        Ok(view(session))
    })
}

async fn deliver_code(
    state: web::Data<AppState>,
    id: Uuid,
    method: VerificationMethod,
    resend: bool,
) -> Result<HttpResponse, ApiError> {
    let sent_to = edit_step(&state, &id, WizardStep::Verification, |session| {
        let guest = &session.wizard.guest_info;
        Ok(match method {
            VerificationMethod::Sms => mask_phone(&guest.phone),
            VerificationMethod::Email => mask_email(&guest.email),
        })
    })?;

    state.config.delays.send_code_task().run().await?;

    let settings = &state.config.two_factor;
    let expires_in = edit_step(&state, &id, WizardStep::Verification, |session| {
        let now = Utc::now();
        if resend {
            session.verification.resend(method, now, settings);
        } else {
            session.verification.send(method, now, settings);
        }
        Ok(session.verification.seconds_left(now))
    })?;
    log::info!("Sent verification code for booking session {} by {}", id, method.label());

    Ok(HttpResponse::Ok().json(CodeSent {
        method,
        sent_to,
        expires_in,
        countdown: format_countdown(expires_in),
    }))
}

// POST /api/bookings/{id}/verification/send
pub async fn send_code(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    deliver_code(state, path.into_inner(), input.method, false).await
}

// POST /api/bookings/{id}/verification/resend
pub async fn resend_code(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    deliver_code(state, path.into_inner(), input.method, true).await
}

// POST /api/bookings/{id}/verification/verify
pub async fn verify_code(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    edit_step(&state, &id, WizardStep::Verification, |_| Ok(()))?;

    state.config.delays.verify_code_task().run().await?;

    let settings = &state.config.two_factor;
    edit_step(&state, &id, WizardStep::Verification, |session| {
        match session.verification.verify(input.code.trim(), Utc::now(), settings) {
            Ok(()) => {
                session.wizard.two_fa_verified = true;
                log::info!("Booking session {} passed verification", id);
                Ok(view(session))
            }
            Err(e) => {
                log::warn!("Verification failed for booking session {}: {}", id, e);
                Err(e.into())
            }
        }
    })
}

// PUT /api/bookings/{id}/policies/{policy}
pub async fn update_policy(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    input: web::Json<PolicyRequest>,
) -> Result<HttpResponse, ApiError> {
    let (id, policy) = path.into_inner();
    let policy: PolicyId = policy.parse()?;

    edit_step(&state, &id, WizardStep::Review, |session| {
        session.wizard.policies.set(policy, input.accepted);
        Ok(view(session))
    })
}

// POST /api/bookings/{id}/advance
pub async fn advance(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    edit(&state, &path, |session| {
        BookingService::ensure_editable(session)?;
        WizardService::try_advance(&mut session.wizard)?;
        Ok(view(session))
    })
}

// POST /api/bookings/{id}/retreat
pub async fn retreat(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    edit(&state, &path, |session| {
        BookingService::ensure_editable(session)?;
        WizardService::try_retreat(&mut session.wizard)?;
        Ok(view(session))
    })
}

// GET /api/bookings/{id}/summary
pub async fn get_summary(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.bookings.get(&path).ok_or_else(ApiError::booking_not_found)?;
    let summary = BookingService::summary(&state.catalog, &state.pricing, &session)?;
    Ok(HttpResponse::Ok().json(summary))
}

fn reopen(state: &AppState, id: &Uuid) {
    state.bookings.with(id, |session| {
        if session.status == BookingStatus::Processing {
            session.status = BookingStatus::InProgress;
            session.pending = None;
        }
    });
}

// POST /api/bookings/{id}/complete
pub async fn complete_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let (handle, pending) = state.config.delays.complete_booking_task().start(|| ());

    let existing = edit(&state, &id, |session| {
        let existing = BookingService::begin_completion(session)?;
        if existing.is_none() {
            session.pending = Some(handle);
        }
        Ok(existing)
    })?;
    if let Some(confirmation) = existing {
        return Ok(HttpResponse::Ok().json(confirmation));
    }

    log::info!("Processing booking session {}", id);
    if let Err(e) = pending.await {
        if e == TaskError::TimedOut {
            reopen(&state, &id);
        }
        log::warn!("Booking session {} was not completed: {}", id, e);
        return Err(e.into());
    }

    let booking_id = generate_booking_id(&mut rand::thread_rng());
    let mut profile = state.profile();
    let confirmation = edit(&state, &id, |session| {
        if session.status != BookingStatus::Processing {
            return Err(TaskError::Cancelled.into());
        }
        Ok(BookingService::confirm(
            session,
            booking_id,
            &state.catalog,
            &state.pricing,
            profile.profile.loyalty_points,
        )?)
    })?;

    profile.profile.loyalty_points = confirmation.loyalty.new_balance;
    let trip_id = (profile.trips.len() + 1).to_string();
    let destination = state
        .catalog
        .hotel(confirmation.hotel_id)
        .map(|hotel| hotel.location.clone())
        .unwrap_or_default();
    profile
        .trips
        .insert(0, BookingService::trip_for(&confirmation, trip_id, destination));
    drop(profile);

    log::info!("Confirmed booking {} for session {}", confirmation.booking_id, id);
    Ok(HttpResponse::Ok().json(confirmation))
}

// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    edit(&state, &path, |session| {
        BookingService::cancel_completion(session)?;
        log::info!("Cancelled pending completion of booking session {}", session.id);
        Ok(view(session))
    })
}

// GET /api/bookings/{id}/calendar.ics
pub async fn download_calendar(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.bookings.get(&path).ok_or_else(ApiError::booking_not_found)?;
    let event = BookingService::stay_event(&session)?;

    Ok(HttpResponse::Ok()
        .content_type("text/calendar; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", ics_filename(&event.booking_id)),
        ))
        .body(event.to_ics(Utc::now())))
}

// GET /api/bookings/{id}/calendar-links
pub async fn calendar_links(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let session = state.bookings.get(&id).ok_or_else(ApiError::booking_not_found)?;
    let event = BookingService::stay_event(&session)?;
    let ics_path = format!("/api/bookings/{}/calendar.ics", id);

    let Some(target) = query.target.as_deref() else {
        return Ok(HttpResponse::Ok().json(event.links(&ics_path)?));
    };
    let url = match target.parse::<CalendarTarget>()? {
        CalendarTarget::Google => event.google_url()?.to_string(),
        CalendarTarget::Outlook => event.outlook_url()?.to_string(),
        CalendarTarget::Apple | CalendarTarget::Ics => ics_path,
    };

    Ok(HttpResponse::Ok().json(CalendarLink {
        target: target.to_string(),
        url,
    }))
}
