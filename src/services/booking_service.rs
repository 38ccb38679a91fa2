use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use crate::db::fixtures::Catalog;
use crate::models::{
    booking::{
        BookingConfirmation, BookingSelection, BookingSession, BookingStatus, PrimaryGuest,
        StayDates,
    },
    catalog::{Hotel, Room},
    pricing::PriceBreakdown,
    user::{Trip, TripStatus},
    wizard::{StepInfo, WizardStep},
};
use crate::services::{
    calendar_service::StayEvent,
    loyalty_service::LoyaltyService,
    pricing_service::{PricingError, PricingService},
    wizard_service::{WizardError, WizardService},
};

#[derive(Debug, PartialEq)]
pub enum BookingError {
    HotelNotFound(u32),
    RoomNotFound { hotel_id: u32, room_id: u32 },
    InvalidDates,
    NoGuests,
    TooManyGuests,
    Pricing(PricingError),
    Wizard(WizardError),
    Processing,
    AlreadyConfirmed,
    NothingToCancel,
    NotConfirmed,
    MissingDates,
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingError::HotelNotFound(id) => write!(f, "Hotel {} not found", id),
            BookingError::RoomNotFound { hotel_id, room_id } => {
                write!(f, "Room {} not found in hotel {}", room_id, hotel_id)
            }
            BookingError::InvalidDates => write!(f, "Check-out must be after check-in"),
            BookingError::NoGuests => write!(f, "At least one adult is required"),
            BookingError::TooManyGuests => {
                write!(f, "At most {} adults and {} children per booking", MAX_ADULTS, MAX_CHILDREN)
            }
            BookingError::Pricing(e) => write!(f, "{}", e),
            BookingError::Wizard(e) => write!(f, "{}", e),
            BookingError::Processing => write!(f, "The booking is being processed"),
            BookingError::AlreadyConfirmed => write!(f, "The booking is already confirmed"),
            BookingError::NothingToCancel => write!(f, "No booking request is in progress"),
            BookingError::NotConfirmed => write!(f, "The booking has not been confirmed yet"),
            BookingError::MissingDates => {
                write!(f, "The booking has no check-in and check-out dates")
            }
        }
    }
}

impl std::error::Error for BookingError {}

impl From<PricingError> for BookingError {
    fn from(e: PricingError) -> Self {
        BookingError::Pricing(e)
    }
}

impl From<WizardError> for BookingError {
    fn from(e: WizardError) -> Self {
        BookingError::Wizard(e)
    }
}

/// Sidebar of the booking page.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    pub hotel_name: String,
    pub hotel_address: String,
    pub room_name: String,
    pub dates: StayDates,
    pub guests: String,
    pub ready: bool,
    pub hourly_rate: rust_decimal::Decimal,
    pub pricing: PriceBreakdown,
    pub current_step: WizardStep,
    pub steps: Vec<StepInfo>,
    pub primary_action: &'static str,
    pub can_proceed: bool,
}

pub const MAX_ADULTS: u32 = 16;
pub const MAX_CHILDREN: u32 = 16;

/// `"1 guest"`, `"3 guests"`
pub fn guest_summary(adults: u32, children: u32) -> String {
    let total = adults.saturating_add(children);
    format!("{} guest{}", total, if total == 1 { "" } else { "s" })
}

/// A selection can be booked once both dates and at least one adult are set.
pub fn is_ready(selection: &BookingSelection) -> bool {
    selection.check_in.is_some() && selection.check_out.is_some() && selection.adults > 0
}

/// `SF-` followed by eight random digits.
pub fn generate_booking_id<R: Rng>(rng: &mut R) -> String {
    format!("SF-{:08}", rng.gen_range(0..100_000_000u32))
}

pub struct BookingService;

impl BookingService {
    pub fn lookup<'a>(
        catalog: &'a Catalog,
        selection: &BookingSelection,
    ) -> Result<(&'a Hotel, &'a Room), BookingError> {
        let hotel = catalog
            .hotel(selection.hotel_id)
            .ok_or(BookingError::HotelNotFound(selection.hotel_id))?;
        let room = hotel.room(selection.room_id).ok_or(BookingError::RoomNotFound {
            hotel_id: selection.hotel_id,
            room_id: selection.room_id,
        })?;
        Ok((hotel, room))
    }

    /// Checks a selection before a session is opened for it.
    pub fn validate_selection(
        catalog: &Catalog,
        selection: &BookingSelection,
    ) -> Result<(), BookingError> {
        Self::lookup(catalog, selection)?;
        if selection.adults == 0 {
            return Err(BookingError::NoGuests);
        }
        if selection.adults > MAX_ADULTS || selection.children > MAX_CHILDREN {
            return Err(BookingError::TooManyGuests);
        }
        if let (Some(check_in), Some(check_out)) = (selection.check_in, selection.check_out) {
            if check_out <= check_in {
                return Err(BookingError::InvalidDates);
            }
        }
        Ok(())
    }

    pub fn stay_dates(selection: &BookingSelection) -> StayDates {
        StayDates {
            check_in: selection.check_in,
            check_out: selection.check_out,
            nights: PricingService::nights_for_dates(selection.check_in, selection.check_out),
        }
    }

    /// Price of the selected room in the session's display currency.
    pub fn price(
        pricing: &PricingService,
        room: &Room,
        session: &BookingSession,
    ) -> Result<PriceBreakdown, BookingError> {
        let nights = PricingService::nights_for_dates(
            session.selection.check_in,
            session.selection.check_out,
        );
        Ok(pricing.quote_in_currency(
            room.price,
            room.original_price,
            nights,
            session.wizard.currency,
        )?)
    }

    pub fn summary(
        catalog: &Catalog,
        pricing: &PricingService,
        session: &BookingSession,
    ) -> Result<BookingSummary, BookingError> {
        let (hotel, room) = Self::lookup(catalog, &session.selection)?;
        let breakdown = Self::price(pricing, room, session)?;
        let step = session.wizard.current_step;

        Ok(BookingSummary {
            hotel_name: hotel.name.clone(),
            hotel_address: hotel.address.clone(),
            room_name: room.name.clone(),
            dates: Self::stay_dates(&session.selection),
            guests: guest_summary(session.selection.adults, session.selection.children),
            ready: is_ready(&session.selection),
            hourly_rate: PricingService::hourly_rate(breakdown.nightly_rate),
            pricing: breakdown,
            current_step: step,
            steps: WizardStep::ALL.into_iter().map(StepInfo::from).collect(),
            primary_action: WizardService::primary_action_label(step),
            can_proceed: WizardService::can_proceed(step, &session.wizard),
        })
    }

    /// Moves an in-progress session to `processing`. A confirmed session
    /// hands back its confirmation instead.
    pub fn begin_completion(
        session: &mut BookingSession,
    ) -> Result<Option<BookingConfirmation>, BookingError> {
        match session.status {
            BookingStatus::Confirmed => {
                return session
                    .confirmation
                    .clone()
                    .map(Some)
                    .ok_or(BookingError::AlreadyConfirmed)
            }
            BookingStatus::Processing => return Err(BookingError::Processing),
            BookingStatus::InProgress => {}
        }
        if !WizardService::can_complete(&session.wizard) {
            return Err(WizardError::NotReadyToComplete.into());
        }
        session.status = BookingStatus::Processing;
        Ok(None)
    }

    /// Aborts the in-flight completion and reopens the wizard.
    pub fn cancel_completion(session: &mut BookingSession) -> Result<(), BookingError> {
        if session.status != BookingStatus::Processing {
            return Err(BookingError::NothingToCancel);
        }
        if let Some(handle) = session.pending.take() {
            handle.abort();
        }
        session.status = BookingStatus::InProgress;
        Ok(())
    }

    /// Edits are refused once the booking has left the wizard.
    pub fn ensure_editable(session: &BookingSession) -> Result<(), BookingError> {
        match session.status {
            BookingStatus::InProgress => Ok(()),
            BookingStatus::Processing => Err(BookingError::Processing),
            BookingStatus::Confirmed => Err(BookingError::AlreadyConfirmed),
        }
    }

    pub fn confirm(
        session: &mut BookingSession,
        booking_id: String,
        catalog: &Catalog,
        pricing: &PricingService,
        loyalty_balance: u64,
    ) -> Result<BookingConfirmation, BookingError> {
        let (hotel, room) = Self::lookup(catalog, &session.selection)?;
        let breakdown = Self::price(pricing, room, session)?;
        let earned = LoyaltyService::points_for(breakdown.total);
        let guest = &session.wizard.guest_info;
        let payment_method = session
            .wizard
            .payment_method
            .map(|m| m.name().to_string())
            .unwrap_or_default();

        let confirmation = BookingConfirmation {
            booking_id,
            status: BookingStatus::Confirmed,
            hotel_id: hotel.id,
            hotel_name: hotel.name.clone(),
            hotel_address: hotel.address.clone(),
            room_name: room.name.clone(),
            dates: Self::stay_dates(&session.selection),
            adults: session.selection.adults,
            children: session.selection.children,
            primary_guest: PrimaryGuest {
                name: guest.full_name(),
                email: guest.email.trim().to_string(),
                phone: guest.phone.trim().to_string(),
            },
            payment_method,
            pricing: breakdown,
            loyalty: LoyaltyService::booking_summary(loyalty_balance, earned),
            created_at: Utc::now(),
        };

        session.status = BookingStatus::Confirmed;
        session.pending = None;
        session.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    pub fn stay_event(session: &BookingSession) -> Result<StayEvent, BookingError> {
        let confirmation = session.confirmation.as_ref().ok_or(BookingError::NotConfirmed)?;
        StayEvent::from_confirmation(confirmation).ok_or(BookingError::MissingDates)
    }

    /// The profile's trip entry for a confirmed booking.
    pub fn trip_for(
        confirmation: &BookingConfirmation,
        trip_id: String,
        destination: String,
    ) -> Trip {
        let today = confirmation.created_at.date_naive();
        let departure_date = confirmation.dates.check_in.unwrap_or(today);

        Trip {
            id: trip_id,
            destination,
            departure_date,
            return_date: confirmation.dates.check_out.unwrap_or(departure_date),
            status: TripStatus::Upcoming,
            booking_reference: confirmation.booking_id.clone(),
            total_amount: confirmation.pricing.total,
            currency: confirmation.pricing.currency,
            hotel_name: confirmation.hotel_name.clone(),
            room_type: confirmation.room_name.clone(),
            guests: confirmation.adults.saturating_add(confirmation.children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::currency::Currency;
    use crate::models::wizard::{PaymentMethod, PolicyId};
    use crate::services::pricing_service::PricingPolicy;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn selection() -> BookingSelection {
        BookingSelection {
            hotel_id: 1,
            room_id: 1,
            check_in: NaiveDate::from_ymd_opt(2024, 12, 15),
            check_out: NaiveDate::from_ymd_opt(2024, 12, 18),
            adults: 2,
            children: 0,
        }
    }

    fn ready_session() -> BookingSession {
        let mut session = BookingSession::new(selection());
        session.wizard.current_step = WizardStep::Review;
        session.wizard.guest_info.first_name = "John".to_string();
        session.wizard.guest_info.last_name = "Doe".to_string();
        session.wizard.guest_info.email = "john.doe@example.com".to_string();
        session.wizard.guest_info.phone = "+15551234567".to_string();
        session.wizard.payment_method = Some(PaymentMethod::Card);
        session.wizard.two_fa_verified = true;
        for policy in [
            PolicyId::Terms,
            PolicyId::Privacy,
            PolicyId::Cancellation,
            PolicyId::Payment,
        ] {
            session.wizard.policies.set(policy, true);
        }
        session
    }

    #[test]
    fn test_summary_for_three_nights() {
        let catalog = Catalog::fixture();
        let pricing = PricingService::new(PricingPolicy::default());
        let summary = BookingService::summary(
            &catalog,
            &pricing,
            &BookingSession::new(selection()),
        )
        .unwrap();

        assert_eq!(summary.dates.nights, 3);
        assert_eq!(summary.pricing.subtotal, dec!(855));
        assert_eq!(summary.pricing.taxes, dec!(103));
        assert_eq!(summary.pricing.service_fee, dec!(43));
        assert_eq!(summary.pricing.total, dec!(1001));
        assert_eq!(summary.pricing.discount, dec!(105));
        assert_eq!(summary.guests, "2 guests");
        assert_eq!(summary.primary_action, "Continue");
        assert_eq!(summary.steps.len(), 4);
        assert!(summary.ready);
    }

    #[test]
    fn test_summary_in_euros() {
        let catalog = Catalog::fixture();
        let pricing = PricingService::new(PricingPolicy::default());
        let mut session = BookingSession::new(selection());
        session.wizard.currency = Currency::Eur;

        let summary = BookingService::summary(&catalog, &pricing, &session).unwrap();
        assert_eq!(summary.pricing.nightly_rate, dec!(242));
        assert_eq!(summary.pricing.total, dec!(849));
    }

    #[test]
    fn test_validate_selection() {
        let catalog = Catalog::fixture();
        assert!(BookingService::validate_selection(&catalog, &selection()).is_ok());

        let mut bad = selection();
        bad.room_id = 9;
        assert_eq!(
            BookingService::validate_selection(&catalog, &bad),
            Err(BookingError::RoomNotFound { hotel_id: 1, room_id: 9 })
        );

        let mut bad = selection();
        bad.check_out = bad.check_in;
        assert_eq!(
            BookingService::validate_selection(&catalog, &bad),
            Err(BookingError::InvalidDates)
        );

        let mut bad = selection();
        bad.adults = 0;
        assert_eq!(BookingService::validate_selection(&catalog, &bad), Err(BookingError::NoGuests));

        let mut bad = selection();
        bad.adults = u32::MAX;
        bad.children = 1;
        assert_eq!(
            BookingService::validate_selection(&catalog, &bad),
            Err(BookingError::TooManyGuests)
        );

        let mut bad = selection();
        bad.children = MAX_CHILDREN + 1;
        assert_eq!(
            BookingService::validate_selection(&catalog, &bad),
            Err(BookingError::TooManyGuests)
        );
        assert_eq!(guest_summary(u32::MAX, 1), format!("{} guests", u32::MAX));
    }

    #[test]
    fn test_completion_lifecycle() {
        let catalog = Catalog::fixture();
        let pricing = PricingService::new(PricingPolicy::default());
        let mut session = ready_session();

        assert!(matches!(BookingService::begin_completion(&mut session), Ok(None)));
        assert_eq!(session.status, BookingStatus::Processing);
        assert!(matches!(
            BookingService::begin_completion(&mut session),
            Err(BookingError::Processing)
        ));

        let confirmation = BookingService::confirm(
            &mut session,
            "SF-00000001".to_string(),
            &catalog,
            &pricing,
            8750,
        )
        .unwrap();
        assert_eq!(confirmation.pricing.total, dec!(1001));
        assert_eq!(confirmation.loyalty.earned, 1001);
        assert_eq!(confirmation.loyalty.new_balance, 9751);
        assert_eq!(confirmation.primary_guest.name, "John Doe");
        assert_eq!(confirmation.payment_method, "Credit/Debit Card");

        let again = BookingService::begin_completion(&mut session).unwrap().unwrap();
        assert_eq!(again.booking_id, "SF-00000001");

        let event = BookingService::stay_event(&session).unwrap();
        assert_eq!(event.title(), "Hotel Stay: Grand Palace Hotel");
    }

    #[test]
    fn test_completion_requires_policies() {
        let mut session = ready_session();
        session.wizard.policies.set(PolicyId::Privacy, false);
        assert!(matches!(
            BookingService::begin_completion(&mut session),
            Err(BookingError::Wizard(WizardError::NotReadyToComplete))
        ));
        assert_eq!(session.status, BookingStatus::InProgress);
    }

    #[test]
    fn test_cancel_completion() {
        let mut session = ready_session();
        assert_eq!(
            BookingService::cancel_completion(&mut session),
            Err(BookingError::NothingToCancel)
        );
        assert!(matches!(BookingService::stay_event(&session), Err(BookingError::NotConfirmed)));

        BookingService::begin_completion(&mut session).unwrap();
        let (handle, _registration) = futures::future::AbortHandle::new_pair();
        session.pending = Some(handle.clone());

        BookingService::cancel_completion(&mut session).unwrap();
        assert_eq!(session.status, BookingStatus::InProgress);
        assert!(session.pending.is_none());
        assert!(handle.is_aborted());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(guest_summary(1, 0), "1 guest");
        assert_eq!(guest_summary(2, 1), "3 guests");

        let mut rng = rand::thread_rng();
        let id = generate_booking_id(&mut rng);
        assert!(id.starts_with("SF-"));
        assert_eq!(id.len(), 11);
        assert!(id[3..].chars().all(|c| c.is_ascii_digit()));

        let mut open = selection();
        open.check_out = None;
        assert!(!is_ready(&open));
    }
}
