//! Read-mostly cache of the current rate table.

use std::time::{Duration, Instant};

use otlist_core::{AppConfig, RateSource, RateTable};
use tokio::sync::RwLock;

use crate::client::ExchangeRateClient;
use crate::error::RatesError;

struct CachedTable {
    table: RateTable,
    fetched_at: Instant,
}

/// Serves the current [`RateTable`], refreshing it from the feed at most
/// once per TTL.
///
/// A failed refresh stores the fallback table with the same TTL as a live
/// one, so a dead feed is not polled on every request.
pub struct RateCache {
    client: ExchangeRateClient,
    ttl: Duration,
    entry: RwLock<Option<CachedTable>>,
}

impl RateCache {
    #[must_use]
    pub fn new(client: ExchangeRateClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// # Errors
    ///
    /// Returns [`RatesError`] if the feed client cannot be built from
    /// `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, RatesError> {
        Ok(Self::new(
            ExchangeRateClient::from_config(config)?,
            Duration::from_secs(config.fx_cache_ttl_secs),
        ))
    }

    /// The cached table, or a freshly fetched one when the cache is empty
    /// or stale. Never fails.
    pub async fn rates(&self) -> RateTable {
        if let Some(table) = self.fresh().await {
            tracing::debug!("using cached exchange rates");
            return table;
        }

        let mut entry = self.entry.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = entry.as_ref().filter(|c| c.fetched_at.elapsed() < self.ttl) {
            return cached.table.clone();
        }

        let table = match self.client.fetch_latest().await {
            Ok(table) => {
                tracing::info!(usd = table.usd, cop = table.cop, "fetched exchange rates");
                table
            }
            Err(e) => {
                tracing::warn!(error = %e, "exchange rate fetch failed, using fallback rates");
                RateTable::fallback()
            }
        };
        *entry = Some(CachedTable {
            table: table.clone(),
            fetched_at: Instant::now(),
        });
        table
    }

    /// Drops the cached table so the next read refetches.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    async fn fresh(&self) -> Option<RateTable> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.table.clone())
    }
}

impl RateSource for RateCache {
    async fn current_rates(&self) -> RateTable {
        self.rates().await
    }
}
