use std::collections::BTreeMap;

use crate::models::wizard::{GuestInfo, WizardState, WizardStep};
use crate::services::validation::{is_valid_email, is_valid_phone, INVALID_EMAIL, INVALID_PHONE};

#[derive(Debug, PartialEq)]
pub enum WizardError {
    StepIncomplete(WizardStep),
    NoNextStep,
    NoPreviousStep,
    WrongStep { expected: WizardStep, current: WizardStep },
    NotReadyToComplete,
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardError::StepIncomplete(step) => {
                write!(f, "Step {} ({}) is not complete", step.number(), step.title())
            }
            WizardError::NoNextStep => write!(f, "Already at the final step"),
            WizardError::NoPreviousStep => write!(f, "Already at the first step"),
            WizardError::WrongStep { expected, current } => write!(
                f,
                "This can only be changed on step {} ({}); the booking is on step {}",
                expected.number(),
                expected.title(),
                current.number()
            ),
            WizardError::NotReadyToComplete => write!(
                f,
                "All required policies must be accepted on the final step before completing the booking"
            ),
        }
    }
}

impl std::error::Error for WizardError {}

/// Step gating for the booking wizard. Every function is pure over
/// [`WizardState`].
pub struct WizardService;

impl WizardService {
    /// Inline messages for fields that are filled in but malformed.
    pub fn guest_info_errors(info: &GuestInfo) -> BTreeMap<&'static str, &'static str> {
        let mut errors = BTreeMap::new();
        if !info.email.is_empty() && !is_valid_email(&info.email) {
            errors.insert("email", INVALID_EMAIL);
        }
        if !info.phone.is_empty() && !is_valid_phone(&info.phone) {
            errors.insert("phone", INVALID_PHONE);
        }
        errors
    }

    /// Fields still blocking the first step, in form order.
    pub fn missing_guest_fields(info: &GuestInfo) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if info.first_name.trim().is_empty() {
            missing.push("first_name");
        }
        if info.last_name.trim().is_empty() {
            missing.push("last_name");
        }
        if !is_valid_email(info.email.trim()) {
            missing.push("email");
        }
        if !is_valid_phone(&info.phone) {
            missing.push("phone");
        }
        missing
    }

    pub fn guest_info_complete(info: &GuestInfo) -> bool {
        Self::missing_guest_fields(info).is_empty()
    }

    pub fn can_proceed(step: WizardStep, state: &WizardState) -> bool {
        match step {
            WizardStep::GuestInfo => Self::guest_info_complete(&state.guest_info),
            WizardStep::Payment => state.payment_method.is_some(),
            WizardStep::Verification => state.two_fa_verified,
            WizardStep::Review => state.policies_accepted(),
        }
    }

    /// Moves one step forward when the current step is complete; otherwise
    /// returns the state unchanged.
    pub fn advance(state: &WizardState) -> WizardState {
        let mut next = state.clone();
        let _ = Self::try_advance(&mut next);
        next
    }

    /// Moves one step back; unchanged on the first step.
    pub fn retreat(state: &WizardState) -> WizardState {
        let mut previous = state.clone();
        let _ = Self::try_retreat(&mut previous);
        previous
    }

    pub fn try_advance(state: &mut WizardState) -> Result<WizardStep, WizardError> {
        let current = state.current_step;
        if !Self::can_proceed(current, state) {
            return Err(WizardError::StepIncomplete(current));
        }
        let next = current.next().ok_or(WizardError::NoNextStep)?;
        state.current_step = next;
        log::debug!("Booking wizard advanced to step {}", next.number());
        Ok(next)
    }

    pub fn try_retreat(state: &mut WizardState) -> Result<WizardStep, WizardError> {
        let previous = state
            .current_step
            .previous()
            .ok_or(WizardError::NoPreviousStep)?;
        state.current_step = previous;
        log::debug!("Booking wizard moved back to step {}", previous.number());
        Ok(previous)
    }

    /// Payloads may only change while their own step is on screen, so a
    /// step that has been passed stays complete.
    pub fn require_step(state: &WizardState, expected: WizardStep) -> Result<(), WizardError> {
        if state.current_step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                current: state.current_step,
            })
        }
    }

    pub fn can_complete(state: &WizardState) -> bool {
        state.current_step.is_last() && state.policies_accepted()
    }

    pub fn primary_action_label(step: WizardStep) -> &'static str {
        if step.is_last() {
            "Complete Booking"
        } else {
            "Continue"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wizard::{PaymentMethod, PolicyId};

    fn valid_guest() -> GuestInfo {
        GuestInfo {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 555 123 4567".to_string(),
            ..GuestInfo::default()
        }
    }

    fn accept_all(state: &mut WizardState) {
        for policy in [
            PolicyId::Terms,
            PolicyId::Privacy,
            PolicyId::Cancellation,
            PolicyId::Payment,
        ] {
            state.policies.set(policy, true);
        }
    }

    fn state_at(step: WizardStep) -> WizardState {
        WizardState {
            current_step: step,
            ..WizardState::default()
        }
    }

    #[test]
    fn test_advance_is_a_no_op_when_step_incomplete() {
        for step in WizardStep::ALL {
            let state = state_at(step);
            assert!(!WizardService::can_proceed(step, &state));
            assert_eq!(WizardService::advance(&state).current_step, step);
        }
    }

    #[test]
    fn test_single_guest_field_is_not_enough() {
        let mut state = WizardState::default();
        state.guest_info.city = "Paris".to_string();
        assert!(!WizardService::can_proceed(WizardStep::GuestInfo, &state));

        state.guest_info = valid_guest();
        assert!(WizardService::can_proceed(WizardStep::GuestInfo, &state));
    }

    #[test]
    fn test_missing_guest_fields_listed_in_order() {
        let mut info = valid_guest();
        info.last_name = "  ".to_string();
        info.email = "john@invalid".to_string();
        assert_eq!(WizardService::missing_guest_fields(&info), vec!["last_name", "email"]);
    }

    #[test]
    fn test_guest_info_errors_only_for_filled_fields() {
        let mut info = GuestInfo::default();
        assert!(WizardService::guest_info_errors(&info).is_empty());

        info.email = "nope".to_string();
        info.phone = "abc".to_string();
        let errors = WizardService::guest_info_errors(&info);
        assert_eq!(errors.get("email"), Some(&INVALID_EMAIL));
        assert_eq!(errors.get("phone"), Some(&INVALID_PHONE));
    }

    #[test]
    fn test_full_walk_through() {
        let mut state = WizardState::default();
        state.guest_info = valid_guest();
        state = WizardService::advance(&state);
        assert_eq!(state.current_step, WizardStep::Payment);

        state.payment_method = Some(PaymentMethod::Paypal);
        state = WizardService::advance(&state);
        assert_eq!(state.current_step, WizardStep::Verification);

        state.two_fa_verified = true;
        state = WizardService::advance(&state);
        assert_eq!(state.current_step, WizardStep::Review);
        assert!(!WizardService::can_complete(&state));

        accept_all(&mut state);
        assert!(WizardService::can_complete(&state));
        // no step past the last one
        assert_eq!(WizardService::advance(&state).current_step, WizardStep::Review);
        assert_eq!(WizardService::try_advance(&mut state), Err(WizardError::NoNextStep));
    }

    #[test]
    fn test_retreat_stops_at_first_step() {
        let state = state_at(WizardStep::Verification);
        let back = WizardService::retreat(&state);
        assert_eq!(back.current_step, WizardStep::Payment);
        let back = WizardService::retreat(&WizardService::retreat(&back));
        assert_eq!(back.current_step, WizardStep::GuestInfo);

        let mut first = state_at(WizardStep::GuestInfo);
        assert_eq!(WizardService::try_retreat(&mut first), Err(WizardError::NoPreviousStep));
    }

    #[test]
    fn test_try_advance_reports_blocking_step() {
        let mut state = state_at(WizardStep::Payment);
        assert_eq!(
            WizardService::try_advance(&mut state),
            Err(WizardError::StepIncomplete(WizardStep::Payment))
        );
    }

    #[test]
    fn test_require_step() {
        let state = state_at(WizardStep::Payment);
        assert!(WizardService::require_step(&state, WizardStep::Payment).is_ok());
        assert_eq!(
            WizardService::require_step(&state, WizardStep::GuestInfo),
            Err(WizardError::WrongStep {
                expected: WizardStep::GuestInfo,
                current: WizardStep::Payment
            })
        );
    }

    #[test]
    fn test_primary_action_label() {
        assert_eq!(WizardService::primary_action_label(WizardStep::GuestInfo), "Continue");
        assert_eq!(WizardService::primary_action_label(WizardStep::Review), "Complete Booking");
    }
}
