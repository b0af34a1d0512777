use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TuitionRange;

pub const REFERENCE_CURRENCY: &str = "USD";

/// Static conversion rates into the reference currency (USD).
///
/// Currencies missing from the table convert at 1.0. Values are multiplied
/// exactly; rounding is left to presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RateTable {
    pub fn standard() -> Self {
        let rates = [
            ("USD", 1.0),
            ("GBP", 1.27),
            ("EUR", 1.08),
            ("CAD", 0.74),
            ("AUD", 0.65),
            ("SGD", 0.74),
            ("CHF", 1.13),
            ("JPY", 0.0067),
            ("CNY", 0.14),
            ("KRW", 0.00075),
            ("HKD", 0.13),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        Self { rates }
    }

    pub fn with_rate(mut self, currency: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(currency.into().to_ascii_uppercase(), rate);
        self
    }

    pub fn rate(&self, currency: &str) -> f64 {
        self.rates
            .get(currency.trim().to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn to_reference(&self, amount: f64, currency: &str) -> f64 {
        amount * self.rate(currency)
    }

    pub fn min_tuition(&self, range: &TuitionRange) -> f64 {
        self.to_reference(range.min, &range.currency)
    }

    pub fn max_tuition(&self, range: &TuitionRange) -> f64 {
        self.to_reference(range.max, &range.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pounds_with_exact_multiplication() {
        let table = RateTable::standard();
        let usd = table.to_reference(100.0, "GBP");
        assert!((usd - 127.0).abs() < 1e-9, "got {usd}");
        assert_eq!(table.to_reference(100.0, "GBP"), 100.0 * 1.27);
    }

    #[test]
    fn unknown_currency_passes_through() {
        let table = RateTable::standard();
        assert_eq!(table.to_reference(5000.0, "NZD"), 5000.0);
        assert_eq!(table.rate("gbp"), 1.27);
    }

    #[test]
    fn custom_rates_override_defaults() {
        let table = RateTable::standard().with_rate("nzd", 0.5);
        assert_eq!(table.to_reference(1000.0, "NZD"), 500.0);
    }
}
