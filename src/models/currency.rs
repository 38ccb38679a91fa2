use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Currencies offered at checkout. Rates are fixed against USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
    Chf,
    Cny,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyInfo {
    pub code: Currency,
    pub name: &'static str,
    pub symbol: &'static str,
    pub rate: Decimal,
    pub popular: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownCurrency(pub String);

impl fmt::Display for UnknownCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown currency code: {}", self.0)
    }
}

impl std::error::Error for UnknownCurrency {}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
        Currency::Chf,
        Currency::Cny,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Chf => "CHF",
            Currency::Cny => "CNY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Jpy => "Japanese Yen",
            Currency::Cad => "Canadian Dollar",
            Currency::Aud => "Australian Dollar",
            Currency::Chf => "Swiss Franc",
            Currency::Cny => "Chinese Yuan",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Cad => "C$",
            Currency::Aud => "A$",
            Currency::Chf => "CHF",
            Currency::Cny => "¥",
        }
    }

    /// Units of this currency per one US dollar.
    pub fn rate(&self) -> Decimal {
        match self {
            Currency::Usd => dec!(1.00),
            Currency::Eur => dec!(0.85),
            Currency::Gbp => dec!(0.73),
            Currency::Jpy => dec!(110.25),
            Currency::Cad => dec!(1.25),
            Currency::Aud => dec!(1.35),
            Currency::Chf => dec!(0.92),
            Currency::Cny => dec!(6.45),
        }
    }

    pub fn popular(&self) -> bool {
        matches!(self, Currency::Usd | Currency::Eur | Currency::Gbp)
    }

    pub fn info(&self) -> CurrencyInfo {
        CurrencyInfo {
            code: *self,
            name: self.name(),
            symbol: self.symbol(),
            rate: self.rate(),
            popular: self.popular(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .iter()
            .find(|c| c.code() == code)
            .copied()
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}
