use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::models::currency::Currency;

/// The four booking steps, serialised as their 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    GuestInfo = 1,
    Payment = 2,
    Verification = 3,
    Review = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::GuestInfo,
        WizardStep::Payment,
        WizardStep::Verification,
        WizardStep::Review,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<WizardStep> {
        WizardStep::try_from(self.number() + 1).ok()
    }

    pub fn previous(self) -> Option<WizardStep> {
        WizardStep::try_from(self.number() - 1).ok()
    }

    pub fn is_last(self) -> bool {
        self == WizardStep::Review
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::GuestInfo => "Guest Information",
            WizardStep::Payment => "Payment Method",
            WizardStep::Verification => "Verification",
            WizardStep::Review => "Review & Book",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::GuestInfo => "Enter your details",
            WizardStep::Payment => "Choose payment option",
            WizardStep::Verification => "Secure confirmation",
            WizardStep::Review => "Final confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidStep(pub u8);

impl fmt::Display for InvalidStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Booking step must be between 1 and 4, got {}", self.0)
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WizardStep::GuestInfo),
            2 => Ok(WizardStep::Payment),
            3 => Ok(WizardStep::Verification),
            4 => Ok(WizardStep::Review),
            other => Err(InvalidStep(other)),
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub id: WizardStep,
    pub title: &'static str,
    pub description: &'static str,
}

impl From<WizardStep> for StepInfo {
    fn from(step: WizardStep) -> Self {
        Self {
            id: step,
            title: step.title(),
            description: step.description(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalGuest {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
}

/// Everything the guest form collects. Only the primary guest's name, email
/// and phone gate the first step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub special_requests: String,
    pub arrival_time: String,
    pub dietary_restrictions: Vec<String>,
    pub accessibility: Vec<String>,
    pub additional_guests: Vec<AdditionalGuest>,
    pub newsletter: bool,
    pub sms_updates: bool,
    pub loyalty_program: bool,
}

impl GuestInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    ApplePay,
    GooglePay,
    BankTransfer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownPaymentMethod(pub String);

impl fmt::Display for UnknownPaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown payment method: {}", self.0)
    }
}

impl std::error::Error for UnknownPaymentMethod {}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Card,
        PaymentMethod::Paypal,
        PaymentMethod::ApplePay,
        PaymentMethod::GooglePay,
        PaymentMethod::BankTransfer,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::ApplePay => "apple-pay",
            PaymentMethod::GooglePay => "google-pay",
            PaymentMethod::BankTransfer => "bank-transfer",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::ApplePay => "Apple Pay",
            PaymentMethod::GooglePay => "Google Pay",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }

    pub fn popular(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .iter()
            .find(|m| m.id() == s)
            .copied()
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// Card data as kept on the session: never the full number or the CVV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSummary {
    pub brand: Option<String>,
    pub last4: String,
    pub expiry: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyId {
    Terms,
    Privacy,
    Cancellation,
    Payment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown policy: {}", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for PolicyId {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terms" => Ok(PolicyId::Terms),
            "privacy" => Ok(PolicyId::Privacy),
            "cancellation" => Ok(PolicyId::Cancellation),
            "payment" => Ok(PolicyId::Payment),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Policy {
    pub id: PolicyId,
    pub title: &'static str,
    pub description: &'static str,
    pub required: bool,
}

pub const POLICIES: [Policy; 4] = [
    Policy {
        id: PolicyId::Terms,
        title: "Terms & Conditions",
        description: "General terms of service and booking conditions",
        required: true,
    },
    Policy {
        id: PolicyId::Privacy,
        title: "Privacy Policy",
        description: "How we collect, use, and protect your personal information",
        required: true,
    },
    Policy {
        id: PolicyId::Cancellation,
        title: "Cancellation Policy",
        description: "Cancellation and refund terms for your booking",
        required: true,
    },
    Policy {
        id: PolicyId::Payment,
        title: "Payment Terms",
        description: "Payment processing and billing information",
        required: true,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAgreement {
    pub agreements: BTreeMap<PolicyId, bool>,
}

impl Default for PolicyAgreement {
    fn default() -> Self {
        Self {
            agreements: POLICIES.iter().map(|p| (p.id, false)).collect(),
        }
    }
}

impl PolicyAgreement {
    pub fn set(&mut self, policy: PolicyId, checked: bool) {
        self.agreements.insert(policy, checked);
    }

    pub fn is_checked(&self, policy: PolicyId) -> bool {
        self.agreements.get(&policy).copied().unwrap_or(false)
    }

    /// True once every required policy has been individually checked.
    pub fn all_required_accepted(&self) -> bool {
        POLICIES
            .iter()
            .filter(|p| p.required)
            .all(|p| self.is_checked(p.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub guest_info: GuestInfo,
    pub payment_method: Option<PaymentMethod>,
    pub card: Option<CardSummary>,
    pub currency: Currency,
    pub two_fa_verified: bool,
    pub policies: PolicyAgreement,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: WizardStep::GuestInfo,
            guest_info: GuestInfo::default(),
            payment_method: None,
            card: None,
            currency: Currency::Usd,
            two_fa_verified: false,
            policies: PolicyAgreement::default(),
        }
    }
}

impl WizardState {
    pub fn policies_accepted(&self) -> bool {
        self.policies.all_required_accepted()
    }
}
