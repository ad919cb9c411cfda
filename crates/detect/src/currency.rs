//! Currency conversion detector: `<amount> <CODE> to <CODE>`.
//!
//! The detector only recognizes the shape. The exchange rate arrives later
//! from `contour-resolve`, so every result with two distinct codes is
//! partial until [`CurrencyResult::with_rate`] is applied.

use crate::number::{format_fixed, format_number, parse_number};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)(?:([$€£¥₹])\s*)?(\d[\d,]*(?:\.\d+)?)\s*([a-z]{3})?\s+(?:to|in|into)(?:\s+([a-z]{1,3}))?$",
    )
    .expect("currency regex")
});

/// ISO 4217 codes the converter accepts, with display names.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("NZD", "New Zealand Dollar"),
    ("CHF", "Swiss Franc"),
    ("SEK", "Swedish Krona"),
    ("NOK", "Norwegian Krone"),
    ("DKK", "Danish Krone"),
    ("PLN", "Polish Zloty"),
    ("CZK", "Czech Koruna"),
    ("HUF", "Hungarian Forint"),
    ("RON", "Romanian Leu"),
    ("TRY", "Turkish Lira"),
    ("BRL", "Brazilian Real"),
    ("MXN", "Mexican Peso"),
    ("ZAR", "South African Rand"),
    ("KRW", "South Korean Won"),
    ("SGD", "Singapore Dollar"),
    ("HKD", "Hong Kong Dollar"),
    ("THB", "Thai Baht"),
    ("IDR", "Indonesian Rupiah"),
    ("MYR", "Malaysian Ringgit"),
    ("PHP", "Philippine Peso"),
    ("ILS", "Israeli Shekel"),
    ("ISK", "Icelandic Krona"),
    ("BGN", "Bulgarian Lev"),
];

const SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyResult {
    pub amount: f64,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted: Option<f64>,
    pub display: String,
    pub is_partial: bool,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CurrencyResult {
    /// A complete pair still waiting for its rate.
    pub fn needs_resolution(&self) -> bool {
        self.to.is_some() && self.rate.is_none() && self.error.is_none()
    }

    /// The cache/lookup key for this pair, e.g. `USD:EUR`.
    pub fn pair_key(&self) -> Option<String> {
        self.to.as_ref().map(|to| format!("{}:{}", self.from, to))
    }

    /// Complete the result with a live rate.
    pub fn with_rate(mut self, rate: f64) -> Self {
        let converted = self.amount * rate;
        let to = self.to.clone().unwrap_or_default();
        self.display = format!(
            "{} {} = {} {}",
            format_number(self.amount),
            self.from,
            format_fixed(converted, 2),
            to
        );
        self.rate = Some(rate);
        self.converted = Some(converted);
        self.is_partial = false;
        self.is_loading = false;
        self.error = None;
        self
    }

    /// Record a failed lookup. The result stays partial.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self.is_loading = false;
        self
    }
}

pub fn is_known_code(code: &str) -> bool {
    CURRENCIES.iter().any(|(c, _)| c.eq_ignore_ascii_case(code))
}

pub fn detect(text: &str) -> Option<CurrencyResult> {
    let normalized = text.trim().replace("->", " to ").replace("=>", " to ");
    let caps = CURRENCY_RE.captures(normalized.trim())?;

    let amount = parse_number(caps.get(2)?.as_str())?;
    let from = match (caps.get(3), caps.get(1)) {
        (Some(code), _) => code.as_str().to_uppercase(),
        (None, Some(symbol)) => SYMBOLS
            .iter()
            .find(|(s, _)| *s == symbol.as_str())
            .map(|(_, code)| code.to_string())?,
        (None, None) => return None,
    };
    if !is_known_code(&from) {
        return None;
    }

    // One or two letters means the target is still being typed.
    let target = match caps.get(4).map(|m| m.as_str().to_uppercase()) {
        Some(code) if code.len() == 3 => {
            if !is_known_code(&code) {
                return None;
            }
            Some(code)
        }
        _ => None,
    };

    let Some(to) = target else {
        return Some(CurrencyResult {
            amount,
            from: from.clone(),
            to: None,
            rate: None,
            converted: None,
            display: format!("{} {from} → …", format_number(amount)),
            is_partial: true,
            is_loading: false,
            error: None,
        });
    };

    let pending = CurrencyResult {
        amount,
        from: from.clone(),
        to: Some(to.clone()),
        rate: None,
        converted: None,
        display: format!("{} {from} → {to}", format_number(amount)),
        is_partial: true,
        is_loading: false,
        error: None,
    };

    if from == to {
        return Some(pending.with_rate(1.0));
    }
    Some(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_pair_is_partial_until_resolved() {
        let result = detect("50 usd to eur").unwrap();
        assert_eq!(result.from, "USD");
        assert_eq!(result.to.as_deref(), Some("EUR"));
        assert!(result.is_partial);
        assert!(result.needs_resolution());
        assert_eq!(result.pair_key().as_deref(), Some("USD:EUR"));
    }

    #[test]
    fn test_with_rate_completes() {
        let result = detect("50 usd to eur").unwrap().with_rate(0.9);
        assert!(!result.is_partial);
        assert_eq!(result.converted, Some(45.0));
        assert_eq!(result.display, "50 USD = 45.00 EUR");
        assert!(!result.needs_resolution());
    }

    #[test]
    fn test_symbol_source() {
        let result = detect("€20 in gbp").unwrap();
        assert_eq!(result.from, "EUR");
        assert_eq!(result.amount, 20.0);
    }

    #[test]
    fn test_missing_target_is_partial_without_lookup() {
        let result = detect("5 USD to").unwrap();
        assert!(result.is_partial);
        assert!(result.to.is_none());
        assert!(!result.needs_resolution());

        let typing = detect("5 USD to e").unwrap();
        assert!(typing.to.is_none());
    }

    #[test]
    fn test_same_code_resolves_locally() {
        let result = detect("10 usd to usd").unwrap();
        assert!(!result.is_partial);
        assert_eq!(result.rate, Some(1.0));
    }

    #[test]
    fn test_unknown_codes_do_not_match() {
        assert!(detect("50 abc to eur").is_none());
        assert!(detect("50 usd to xyz").is_none());
        assert!(detect("5 km to miles").is_none());
    }
}
