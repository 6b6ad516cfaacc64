use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Exchange rates expressed as "1 CNY = rate units".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    pub usd: f64,
    pub cop: f64,
    pub as_of: DateTime<Utc>,
}

impl RateTable {
    /// Reference rates used whenever the live rate feed is unavailable.
    pub const FALLBACK_USD: f64 = 0.138_677_75;
    pub const FALLBACK_COP: f64 = 528.16;

    #[must_use]
    pub fn fallback() -> Self {
        Self {
            usd: Self::FALLBACK_USD,
            cop: Self::FALLBACK_COP,
            as_of: Utc::now(),
        }
    }
}

/// Provider of the current CNY rate table.
///
/// Implementations must always produce a table, degrading to
/// [`RateTable::fallback`] when their backing source fails.
pub trait RateSource: Send + Sync {
    fn current_rates(&self) -> impl Future<Output = RateTable> + Send;
}
