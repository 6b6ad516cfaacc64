use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use otlist_core::products::BASE_CURRENCY;
use otlist_core::RateTable;
use serde::{Deserialize, Serialize};

/// Body of `GET /v4/latest/CNY`. Only `rates` is relied on.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestRatesResponse {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl LatestRatesResponse {
    /// The quoted rate for `code`, when present, finite, and positive.
    #[must_use]
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Builds a rate table, substituting the fallback rate for each
    /// currency the feed left out or quoted as zero.
    #[must_use]
    pub fn into_rate_table(self, as_of: DateTime<Utc>) -> RateTable {
        RateTable {
            usd: self.rate("USD").unwrap_or(RateTable::FALLBACK_USD),
            cop: self.rate("COP").unwrap_or(RateTable::FALLBACK_COP),
            as_of,
        }
    }
}

/// Public shape of the current rates: `{ base, rates: {CNY, USD, COP}, timestamp }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    pub timestamp: String,
}

impl From<&RateTable> for CurrencyRates {
    fn from(table: &RateTable) -> Self {
        let rates = BTreeMap::from([
            (BASE_CURRENCY.to_owned(), 1.0),
            ("USD".to_owned(), table.usd),
            ("COP".to_owned(), table.cop),
        ]);
        Self {
            base: BASE_CURRENCY.to_owned(),
            rates,
            timestamp: table.as_of.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_and_zero_rates_fall_back_per_currency() {
        let response: LatestRatesResponse = serde_json::from_value(json!({
            "base": "CNY",
            "rates": {"CNY": 1, "USD": 0.14, "COP": 0}
        }))
        .unwrap();
        let table = response.into_rate_table(Utc::now());
        assert!((table.usd - 0.14).abs() < f64::EPSILON);
        assert!((table.cop - RateTable::FALLBACK_COP).abs() < f64::EPSILON);

        let empty: LatestRatesResponse = serde_json::from_value(json!({})).unwrap();
        let table = empty.into_rate_table(Utc::now());
        assert!((table.usd - RateTable::FALLBACK_USD).abs() < f64::EPSILON);
    }

    #[test]
    fn currency_rates_shape() {
        let table = RateTable {
            usd: 0.14,
            cop: 530.0,
            as_of: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };
        let body = serde_json::to_value(CurrencyRates::from(&table)).unwrap();
        assert_eq!(
            body,
            json!({
                "base": "CNY",
                "rates": {"CNY": 1.0, "COP": 530.0, "USD": 0.14},
                "timestamp": "2026-03-01T12:00:00.000Z"
            })
        );
    }
}
