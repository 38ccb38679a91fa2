use serde::Deserialize;

use crate::models::wizard::CardSummary;

/// Raw card form fields. Only a [`CardSummary`] outlives the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub name: String,
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups card digits in fours: `4242 4242 4242 4242`. At most 16 digits
/// are kept.
pub fn format_card_number(value: &str) -> String {
    let digits: Vec<char> = digits(value).chars().take(16).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1226` -> `12/26`
pub fn format_expiry(value: &str) -> String {
    let digits = digits(value);
    if digits.len() >= 2 {
        let month = &digits[..2];
        let year: String = digits[2..].chars().take(2).collect();
        format!("{}/{}", month, year)
    } else {
        digits
    }
}

pub fn card_brand(number: &str) -> Option<&'static str> {
    let digits = digits(number);
    let prefix = |len: usize| digits.get(..len).and_then(|p| p.parse::<u32>().ok());

    if digits.starts_with('4') {
        Some("Visa")
    } else if matches!(prefix(2), Some(51..=55)) {
        Some("Mastercard")
    } else if matches!(prefix(2), Some(34 | 37)) {
        Some("American Express")
    } else {
        None
    }
}

impl CardDetails {
    pub fn summarize(&self) -> CardSummary {
        let digits = digits(&self.number);
        let last4 = if digits.len() >= 4 {
            digits[digits.len() - 4..].to_string()
        } else {
            digits.clone()
        };

        CardSummary {
            brand: card_brand(&digits).map(str::to_string),
            last4,
            expiry: format_expiry(&self.expiry),
            name: self.name.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("4242-4242 42"), "4242 4242 42");
        assert_eq!(format_card_number("42424242424242429999"), "4242 4242 4242 4242");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("1226"), "12/26");
        assert_eq!(format_expiry("12/2026"), "12/20");
        assert_eq!(format_expiry("1"), "1");
    }

    #[test]
    fn test_card_brand_detection() {
        assert_eq!(card_brand("4111 1111 1111 1111"), Some("Visa"));
        assert_eq!(card_brand("5500 0000 0000 0004"), Some("Mastercard"));
        assert_eq!(card_brand("3400 000000 00009"), Some("American Express"));
        assert_eq!(card_brand("3700 000000 00002"), Some("American Express"));
        assert_eq!(card_brand("6011 0000 0000 0004"), None);
    }

    #[test]
    fn test_summary_drops_sensitive_fields() {
        let details = CardDetails {
            number: "4242 4242 4242 4242".to_string(),
            expiry: "1226".to_string(),
            cvv: "123".to_string(),
            name: " Jane Roe ".to_string(),
        };
        let summary = details.summarize();
        assert_eq!(summary.brand.as_deref(), Some("Visa"));
        assert_eq!(summary.last4, "4242");
        assert_eq!(summary.expiry, "12/26");
        assert_eq!(summary.name, "Jane Roe");
    }
}
