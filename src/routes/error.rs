use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::models::{currency::UnknownCurrency, wizard::{UnknownPaymentMethod, UnknownPolicy}};
use crate::services::{
    booking_service::BookingError,
    calendar_service::UnknownCalendar,
    pricing_service::PricingError,
    review_service::ReviewError,
    search_service::SearchError,
    simulated_task::TaskError,
    two_factor_service::VerificationError,
    wizard_service::WizardError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Every failed request ends up here and is rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn not_found(error: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error, message)
    }

    pub fn conflict(error: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, error, message)
    }

    pub fn booking_not_found() -> Self {
        Self::not_found("booking_not_found", "Booking session not found")
    }

    pub fn review_not_found() -> Self {
        Self::not_found("review_not_found", "Review draft not found")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorResponse {
            error: self.error.to_string(),
            message: self.message.clone(),
        })
    }
}

impl From<WizardError> for ApiError {
    fn from(e: WizardError) -> Self {
        let error = match e {
            WizardError::StepIncomplete(_) => "step_incomplete",
            WizardError::NoNextStep | WizardError::NoPreviousStep => "invalid_transition",
            WizardError::WrongStep { .. } => "wrong_step",
            WizardError::NotReadyToComplete => "not_ready",
        };
        ApiError::conflict(error, e.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Wizard(inner) => inner.into(),
            BookingError::Pricing(inner) => inner.into(),
            BookingError::HotelNotFound(_) => ApiError::not_found("hotel_not_found", e.to_string()),
            BookingError::RoomNotFound { .. } => {
                ApiError::not_found("room_not_found", e.to_string())
            }
            BookingError::InvalidDates | BookingError::NoGuests | BookingError::TooManyGuests => {
                ApiError::bad_request("invalid_selection", e.to_string())
            }
            BookingError::Processing => ApiError::conflict("booking_processing", e.to_string()),
            BookingError::AlreadyConfirmed => {
                ApiError::conflict("booking_confirmed", e.to_string())
            }
            BookingError::NothingToCancel => ApiError::conflict("nothing_to_cancel", e.to_string()),
            BookingError::NotConfirmed => {
                ApiError::conflict("booking_not_confirmed", e.to_string())
            }
            BookingError::MissingDates => ApiError::conflict("missing_dates", e.to_string()),
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::Overflow => ApiError::bad_request("invalid_amount", e.to_string()),
            PricingError::NegativeRate | PricingError::ZeroNights => {
                ApiError::bad_request("invalid_pricing", e.to_string())
            }
        }
    }
}

impl From<VerificationError> for ApiError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::InvalidFormat => {
                ApiError::bad_request("invalid_code_format", e.to_string())
            }
            VerificationError::InvalidCode { .. } => {
                ApiError::bad_request("invalid_code", e.to_string())
            }
            VerificationError::CodeNotSent => ApiError::conflict("code_not_sent", e.to_string()),
            VerificationError::CodeExpired => ApiError::conflict("code_expired", e.to_string()),
            VerificationError::TooManyAttempts => {
                ApiError::conflict("too_many_attempts", e.to_string())
            }
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(e: ReviewError) -> Self {
        match e {
            ReviewError::RatingOutOfRange(_) => {
                ApiError::bad_request("invalid_rating", e.to_string())
            }
            ReviewError::TitleTooLong | ReviewError::FeedbackTooLong => {
                ApiError::bad_request("too_long", e.to_string())
            }
            ReviewError::Incomplete => ApiError::conflict("review_incomplete", e.to_string()),
            ReviewError::AlreadySubmitted => ApiError::conflict("review_submitted", e.to_string()),
            ReviewError::SubmissionInProgress => {
                ApiError::conflict("review_submitting", e.to_string())
            }
            ReviewError::PhotoNotFound(_) => ApiError::not_found("photo_not_found", e.to_string()),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        ApiError::bad_request("invalid_filter", e.to_string())
    }
}

impl From<TaskError> for ApiError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Cancelled => ApiError::conflict("cancelled", e.to_string()),
            TaskError::TimedOut => {
                ApiError::new(StatusCode::GATEWAY_TIMEOUT, "timeout", e.to_string())
            }
        }
    }
}

impl From<UnknownCurrency> for ApiError {
    fn from(e: UnknownCurrency) -> Self {
        ApiError::bad_request("unknown_currency", e.to_string())
    }
}

impl From<UnknownPaymentMethod> for ApiError {
    fn from(e: UnknownPaymentMethod) -> Self {
        ApiError::bad_request("unknown_payment_method", e.to_string())
    }
}

impl From<UnknownPolicy> for ApiError {
    fn from(e: UnknownPolicy) -> Self {
        ApiError::not_found("unknown_policy", e.to_string())
    }
}

impl From<UnknownCalendar> for ApiError {
    fn from(e: UnknownCalendar) -> Self {
        ApiError::bad_request("unknown_calendar", e.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wizard::WizardStep;

    #[test]
    fn test_status_mapping() {
        let e: ApiError = BookingError::HotelNotFound(7).into();
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(e.error, "hotel_not_found");

        let e: ApiError =
            BookingError::Wizard(WizardError::StepIncomplete(WizardStep::Payment)).into();
        assert_eq!(e.status_code(), StatusCode::CONFLICT);
        assert_eq!(e.error, "step_incomplete");

        let e: ApiError = VerificationError::InvalidCode { attempts_remaining: 2 }.into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "Invalid verification code. Please try again.");

        let e: ApiError = PricingError::Overflow.into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.error, "invalid_amount");

        let e: ApiError = TaskError::TimedOut.into();
        assert_eq!(e.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }
}
