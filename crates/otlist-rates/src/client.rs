//! HTTP client for the exchange-rate feed.
//!
//! One endpoint, one job: fetch the latest CNY-based quotes and turn them
//! into a [`RateTable`]. Caching and fallback live in [`crate::RateCache`].

use std::time::Duration;

use chrono::Utc;
use otlist_core::{AppConfig, RateTable};
use reqwest::{Client, Url};

use crate::error::RatesError;
use crate::types::LatestRatesResponse;

const DEFAULT_FEED_URL: &str = "https://api.exchangerate-api.com/v4/latest/CNY";

pub struct ExchangeRateClient {
    client: Client,
    feed_url: Url,
}

impl ExchangeRateClient {
    /// Creates a client pointed at the public feed.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, RatesError> {
        Self::with_feed_url(DEFAULT_FEED_URL, timeout_secs)
    }

    /// Creates a client for an arbitrary feed URL (a wiremock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`RatesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RatesError::InvalidUrl`] if `feed_url`
    /// does not parse.
    pub fn with_feed_url(feed_url: &str, timeout_secs: u64) -> Result<Self, RatesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("otlist/0.1 (exchange-rates)")
            .build()?;
        let feed_url = Url::parse(feed_url).map_err(|e| RatesError::InvalidUrl {
            url: feed_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, feed_url })
    }

    /// # Errors
    ///
    /// See [`ExchangeRateClient::with_feed_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, RatesError> {
        Self::with_feed_url(&config.fx_api_url, config.fx_timeout_secs)
    }

    #[must_use]
    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    /// Fetches the latest quotes. Missing or zero USD/COP quotes are
    /// replaced individually by their fallback rates.
    ///
    /// # Errors
    ///
    /// - [`RatesError::Http`] on network failure or timeout.
    /// - [`RatesError::UnexpectedStatus`] on a non-2xx status.
    /// - [`RatesError::Deserialize`] if the body is not a rates document.
    pub async fn fetch_latest(&self) -> Result<RateTable, RatesError> {
        let response = self.client.get(self.feed_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        let latest: LatestRatesResponse =
            serde_json::from_str(&body).map_err(|e| RatesError::Deserialize {
                context: self.feed_url.to_string(),
                source: e,
            })?;
        Ok(latest.into_rate_table(Utc::now()))
    }
}
