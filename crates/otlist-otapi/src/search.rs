//! Batched category search with per-item detail enrichment.
//!
//! A listing request over-fetches candidates (1.5× the page size, capped)
//! in fixed-size search batches, then replaces each summary record with its
//! full-detail record. Detail calls run concurrently within bounded chunks;
//! any per-item failure falls back to the summary so one slow or broken item
//! never sinks the listing.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use otlist_core::SortMode;

use crate::error::OtapiError;
use crate::types::{ErrorCode, RawProduct};

/// Page size of each upstream search call.
pub const SEARCH_BATCH_SIZE: usize = 100;
/// Hard cap on candidates gathered for one listing.
pub const MAX_FETCH: usize = 200;
/// Maximum concurrent detail calls.
pub const ENRICH_BATCH_SIZE: usize = 50;

/// One page of category search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBatch {
    pub items: Vec<RawProduct>,
    pub total_count: u64,
    pub error_code: ErrorCode,
}

/// Upstream catalog operations the orchestrator depends on.
pub trait CatalogSource: Sync {
    /// Fetches up to `batch_size` records of `category_id` starting at
    /// `offset`, ordered by `order_by`.
    fn search_category_batch(
        &self,
        category_id: &str,
        order_by: &str,
        offset: usize,
        batch_size: usize,
    ) -> impl Future<Output = Result<SearchBatch, OtapiError>> + Send;

    /// Fetches the full-detail record of one item. `Ok(None)` when the
    /// upstream reports no such item.
    fn fetch_item_detail(
        &self,
        item_id: &str,
    ) -> impl Future<Output = Result<Option<RawProduct>, OtapiError>> + Send;
}

#[derive(Debug)]
pub struct SearchOutcome {
    /// Enriched records in upstream order, at most the fetch cap.
    pub products: Vec<RawProduct>,
    pub total_count: u64,
    /// Set only when the very first search batch failed at the transport or
    /// HTTP level, so callers can tell an outage from an empty category.
    pub first_batch_error: Option<OtapiError>,
}

/// Number of candidates gathered for a page: `ceil(page_size × 1.5)`,
/// capped at [`MAX_FETCH`].
#[must_use]
pub fn fetch_cap(page_size: usize) -> usize {
    page_size.saturating_mul(3).div_ceil(2).min(MAX_FETCH)
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOrchestrator {
    detail_timeout: Duration,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(detail_timeout: Duration) -> Self {
        Self { detail_timeout }
    }

    /// Gathers and enriches candidates for one listing page.
    ///
    /// Never fails: a mid-stream batch error stops pagination and keeps
    /// whatever was already gathered.
    pub async fn search<S: CatalogSource>(
        &self,
        source: &S,
        category_id: &str,
        sort_mode: SortMode,
        page_size: usize,
    ) -> SearchOutcome {
        let cap = fetch_cap(page_size);
        let order_by = sort_mode.order_expression();
        let mut candidates: Vec<RawProduct> = Vec::with_capacity(cap);
        let mut total_count = 0u64;
        let mut first_batch_error = None;
        let mut offset = 0usize;

        while offset < cap {
            let batch = match source
                .search_category_batch(category_id, order_by, offset, SEARCH_BATCH_SIZE)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(category_id, offset, error = %e, "search batch failed");
                    if offset == 0 {
                        first_batch_error = Some(e);
                    }
                    break;
                }
            };

            if !batch.error_code.is_success() {
                tracing::warn!(
                    category_id,
                    offset,
                    error_code = %batch.error_code,
                    "search batch returned an error code"
                );
                break;
            }

            total_count = batch.total_count;
            let received = batch.items.len();
            if received == 0 {
                break;
            }
            candidates.extend(batch.items);
            if candidates.len() >= cap || received < SEARCH_BATCH_SIZE {
                break;
            }
            offset += SEARCH_BATCH_SIZE;
        }

        candidates.truncate(cap);
        tracing::debug!(
            category_id,
            candidates = candidates.len(),
            total_count,
            "search candidates gathered"
        );

        let products = self.enrich(source, candidates).await;
        SearchOutcome {
            products,
            total_count,
            first_batch_error,
        }
    }

    /// Replaces each summary with its detail record, preserving order.
    ///
    /// At most [`ENRICH_BATCH_SIZE`] detail calls are in flight at once.
    pub async fn enrich<S: CatalogSource>(
        &self,
        source: &S,
        candidates: Vec<RawProduct>,
    ) -> Vec<RawProduct> {
        let mut enriched = Vec::with_capacity(candidates.len());
        let mut remaining = candidates.into_iter();
        loop {
            let chunk: Vec<RawProduct> = remaining.by_ref().take(ENRICH_BATCH_SIZE).collect();
            if chunk.is_empty() {
                break;
            }
            let results = join_all(
                chunk
                    .into_iter()
                    .map(|summary| self.enrich_one(source, summary)),
            )
            .await;
            enriched.extend(results);
        }
        enriched
    }

    async fn enrich_one<S: CatalogSource>(&self, source: &S, summary: RawProduct) -> RawProduct {
        let Some(item_id) = summary.id() else {
            return summary;
        };
        match tokio::time::timeout(self.detail_timeout, source.fetch_item_detail(&item_id)).await {
            Ok(Ok(Some(detail))) => detail,
            Ok(Ok(None)) => {
                tracing::debug!(item_id, "no detail record, keeping summary");
                summary
            }
            Ok(Err(e)) => {
                tracing::warn!(item_id, error = %e, "detail fetch failed, keeping summary");
                summary
            }
            Err(_) => {
                tracing::warn!(
                    item_id,
                    timeout_ms = self.detail_timeout.as_millis(),
                    "detail fetch timed out, keeping summary"
                );
                summary
            }
        }
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
