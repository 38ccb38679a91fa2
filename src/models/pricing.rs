use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::currency::Currency;

/// What a price quote is computed from. Rates are per night, already in
/// `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    pub nightly_rate: Decimal,
    pub nights: u32,
    #[serde(default)]
    pub original_rate: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
}

/// Derived amounts for one stay. Never stored; rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub currency: Currency,
    pub symbol: &'static str,
    pub nightly_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_rate: Option<Decimal>,
    pub nights: u32,
    pub subtotal: Decimal,
    pub taxes: Decimal,
    pub service_fee: Decimal,
    /// Savings against the original rate; already reflected in `subtotal`.
    pub discount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub amount: Decimal,
    pub from: Currency,
    pub to: Currency,
    pub converted: Decimal,
    pub symbol: &'static str,
}
