use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::{
    currency::Currency,
    pricing::{Conversion, PriceBreakdown, PricingInputs},
};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Tax and fee rates applied to every stay subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    pub tax_rate: Decimal,
    pub service_fee_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.12),
            service_fee_rate: dec!(0.05),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum PricingError {
    NegativeRate,
    ZeroNights,
    Overflow,
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::NegativeRate => write!(f, "Nightly rate must not be negative"),
            PricingError::ZeroNights => write!(f, "A stay is at least one night"),
            PricingError::Overflow => write!(f, "Amount is too large to price"),
        }
    }
}

impl std::error::Error for PricingError {}

/// Rounds to whole units, halves away from zero.
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Default)]
pub struct PricingService {
    pub policy: PricingPolicy,
}

impl PricingService {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    /// Whole nights between two instants, rounded up, never below one.
    /// A missing date counts as a one-night stay.
    pub fn nights_between(
        check_in: Option<DateTime<Utc>>,
        check_out: Option<DateTime<Utc>>,
    ) -> u32 {
        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return 1;
        };

        let seconds = (check_out - check_in).num_seconds();
        if seconds <= 0 {
            return 1;
        }

        let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        u32::try_from(days).unwrap_or(u32::MAX).max(1)
    }

    pub fn nights_for_dates(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
        let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        Self::nights_between(check_in.and_then(midnight), check_out.and_then(midnight))
    }

    pub fn subtotal(nightly_rate: Decimal, nights: u32) -> Result<Decimal, PricingError> {
        nightly_rate
            .checked_mul(Decimal::from(nights))
            .ok_or(PricingError::Overflow)
    }

    pub fn taxes(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
        subtotal
            .checked_mul(self.policy.tax_rate)
            .map(round_whole)
            .ok_or(PricingError::Overflow)
    }

    pub fn service_fee(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
        subtotal
            .checked_mul(self.policy.service_fee_rate)
            .map(round_whole)
            .ok_or(PricingError::Overflow)
    }

    /// Savings against the pre-discount rate over the whole stay.
    pub fn discount(
        nightly_rate: Decimal,
        original_rate: Option<Decimal>,
        nights: u32,
    ) -> Result<Decimal, PricingError> {
        match original_rate {
            Some(original) if original > nightly_rate => original
                .checked_sub(nightly_rate)
                .and_then(|saved| saved.checked_mul(Decimal::from(nights)))
                .ok_or(PricingError::Overflow),
            _ => Ok(Decimal::ZERO),
        }
    }

    pub fn discount_percentage(
        nightly_rate: Decimal,
        original_rate: Option<Decimal>,
    ) -> Option<Decimal> {
        let original = original_rate.filter(|o| *o > nightly_rate && !o.is_zero())?;
        let saved = original.checked_sub(nightly_rate)?;
        saved
            .checked_div(original)
            .and_then(|share| share.checked_mul(dec!(100)))
            .map(round_whole)
    }

    pub fn hourly_rate(nightly_rate: Decimal) -> Decimal {
        round_whole(nightly_rate / dec!(24))
    }

    pub fn quote(&self, inputs: &PricingInputs) -> Result<PriceBreakdown, PricingError> {
        if inputs.nightly_rate < Decimal::ZERO {
            return Err(PricingError::NegativeRate);
        }
        if inputs.nights == 0 {
            return Err(PricingError::ZeroNights);
        }

        let subtotal = Self::subtotal(inputs.nightly_rate, inputs.nights)?;
        let taxes = self.taxes(subtotal)?;
        let service_fee = self.service_fee(subtotal)?;
        let discount = Self::discount(inputs.nightly_rate, inputs.original_rate, inputs.nights)?;
        let total = subtotal
            .checked_add(taxes)
            .and_then(|sum| sum.checked_add(service_fee))
            .ok_or(PricingError::Overflow)?;

        Ok(PriceBreakdown {
            currency: inputs.currency,
            symbol: inputs.currency.symbol(),
            nightly_rate: inputs.nightly_rate,
            original_rate: inputs.original_rate,
            nights: inputs.nights,
            subtotal,
            taxes,
            service_fee,
            discount,
            discount_percentage: Self::discount_percentage(
                inputs.nightly_rate,
                inputs.original_rate,
            ),
            total,
        })
    }

    /// Quote for USD catalogue rates shown in another currency. The nightly
    /// rate is converted and rounded to whole units before anything else.
    pub fn quote_in_currency(
        &self,
        usd_rate: Decimal,
        usd_original_rate: Option<Decimal>,
        nights: u32,
        currency: Currency,
    ) -> Result<PriceBreakdown, PricingError> {
        let inputs = PricingInputs {
            nightly_rate: Self::convert_rate(usd_rate, currency)?,
            nights,
            original_rate: usd_original_rate
                .map(|r| Self::convert_rate(r, currency))
                .transpose()?,
            currency,
        };
        self.quote(&inputs)
    }

    /// A USD catalogue rate in `currency`, rounded to whole units.
    pub fn convert_rate(usd_rate: Decimal, currency: Currency) -> Result<Decimal, PricingError> {
        usd_rate
            .checked_mul(currency.rate())
            .map(round_whole)
            .ok_or(PricingError::Overflow)
    }

    pub fn convert(
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Result<Conversion, PricingError> {
        let converted = amount
            .checked_div(from.rate())
            .and_then(|usd| usd.checked_mul(to.rate()))
            .map(round_cents)
            .ok_or(PricingError::Overflow)?;
        Ok(Conversion {
            amount,
            from,
            to,
            converted,
            symbol: to.symbol(),
        })
    }
}
