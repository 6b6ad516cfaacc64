//! Exchange-rate feed client and the process-wide CNY rate cache.

pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use cache::RateCache;
pub use client::ExchangeRateClient;
pub use error::RatesError;
pub use types::{CurrencyRates, LatestRatesResponse};
