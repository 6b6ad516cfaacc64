use otlist_core::AppConfig;
use otlist_rates::{CurrencyRates, RateCache};

use crate::catalog::print_json;

/// Prints the rates the server would serve. A dead feed prints the
/// fallback table.
pub(crate) async fn run_rates(config: &AppConfig) -> anyhow::Result<()> {
    let cache = RateCache::from_config(config)?;
    let table = cache.rates().await;
    print_json(&CurrencyRates::from(&table))
}
