//! Category listing and single-item detail: validation, rates, search,
//! normalization, sort policy, and the response envelope.

use chrono::Utc;
use otlist_core::{CanonicalProduct, ListingEnvelope, RateSource, SortMode, SUCCESS_CODE};
use thiserror::Error;

use crate::error::OtapiError;
use crate::normalize::{normalize_all, normalize_product};
use crate::search::{CatalogSource, SearchOrchestrator};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Error)]
pub enum ListingError {
    /// A required input is missing or blank. Never retried.
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// The upstream answered with an HTTP error.
    #[error("upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The upstream could not be reached at all.
    #[error("upstream service unavailable: {0}")]
    Unavailable(String),

    /// The upstream answered with something that could not be understood.
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl From<OtapiError> for ListingError {
    fn from(err: OtapiError) -> Self {
        if err.is_unreachable() {
            return ListingError::Unavailable(err.to_string());
        }
        match (err.upstream_status(), err) {
            (Some(status), OtapiError::UnexpectedStatus { description, .. }) => {
                ListingError::Upstream {
                    status,
                    message: description,
                }
            }
            (Some(status), other) => ListingError::Upstream {
                status,
                message: other.to_string(),
            },
            (None, other) => ListingError::InvalidResponse(other.to_string()),
        }
    }
}

/// Raw listing inputs as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    pub category_id: Option<String>,
    pub access_key: Option<String>,
    pub sort_type: Option<String>,
    pub page_size: Option<usize>,
    pub language: Option<String>,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub category_id: String,
    pub access_key: String,
    pub sort_mode: SortMode,
    /// Always within `1..=MAX_PAGE_SIZE`.
    pub page_size: usize,
    pub language: String,
}

/// Trims `value` and rejects it when absent or blank.
///
/// # Errors
///
/// Returns [`ListingError::MissingParameter`] naming `name`.
pub fn require(value: Option<&str>, name: &'static str) -> Result<String, ListingError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(ListingError::MissingParameter(name))
}

impl ListingParams {
    /// Checks required inputs and applies defaults: best-sellers sort,
    /// [`DEFAULT_PAGE_SIZE`], and `default_language`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::MissingParameter`] when the access key or
    /// category id is missing.
    pub fn validate(self, default_language: &str) -> Result<ListingRequest, ListingError> {
        let access_key = require(self.access_key.as_deref(), "instanceKey")?;
        let category_id = require(self.category_id.as_deref(), "categoryId")?;
        let sort_mode = self
            .sort_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or(SortMode::BestSellers, SortMode::parse);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let language = self
            .language
            .map(|l| l.trim().to_owned())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| default_language.to_owned());
        Ok(ListingRequest {
            category_id,
            access_key,
            sort_mode,
            page_size,
            language,
        })
    }
}

/// Stable sort by sales count, highest first.
pub fn sort_by_sales(products: &mut [CanonicalProduct]) {
    products.sort_by(|a, b| b.sales_count.cmp(&a.sales_count));
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Produces one page of a category listing.
///
/// Zero upstream results yield an empty, successful envelope. Only when the
/// very first search batch could not be fetched at all is an error
/// returned.
///
/// # Errors
///
/// [`ListingError::Unavailable`] or [`ListingError::Upstream`] when the
/// first search batch failed at the transport or HTTP level.
pub async fn list_category_products<S, R>(
    source: &S,
    rates: &R,
    orchestrator: &SearchOrchestrator,
    request: &ListingRequest,
    request_id: String,
) -> Result<ListingEnvelope, ListingError>
where
    S: CatalogSource,
    R: RateSource,
{
    let rate_table = rates.current_rates().await;
    let outcome = orchestrator
        .search(
            source,
            &request.category_id,
            request.sort_mode,
            request.page_size,
        )
        .await;

    if outcome.products.is_empty() {
        if let Some(err) = outcome.first_batch_error {
            return Err(err.into());
        }
        tracing::info!(
            category_id = %request.category_id,
            request_id = %request_id,
            "category listing is empty"
        );
        return Ok(ListingEnvelope {
            error_code: SUCCESS_CODE.to_owned(),
            content: Vec::new(),
            total_count: 0,
            request_id,
            request_time: now_millis(),
        });
    }

    let mut products = normalize_all(&outcome.products, &rate_table);
    if request.sort_mode == SortMode::BestSellers {
        sort_by_sales(&mut products);
    }
    products.truncate(request.page_size);

    tracing::info!(
        category_id = %request.category_id,
        request_id = %request_id,
        returned = products.len(),
        total_count = outcome.total_count,
        "category listing served"
    );

    Ok(ListingEnvelope {
        error_code: SUCCESS_CODE.to_owned(),
        content: products,
        total_count: outcome.total_count,
        request_id,
        request_time: now_millis(),
    })
}

/// Fetches and normalizes one item. `Ok(None)` when the upstream has no
/// such item.
///
/// # Errors
///
/// [`ListingError::Unavailable`] / [`ListingError::Upstream`] /
/// [`ListingError::InvalidResponse`] when the detail call itself failed.
pub async fn get_single_item_detail<S, R>(
    source: &S,
    rates: &R,
    item_id: &str,
) -> Result<Option<CanonicalProduct>, ListingError>
where
    S: CatalogSource,
    R: RateSource,
{
    let item_id = require(Some(item_id), "itemId")?;
    let Some(raw) = source.fetch_item_detail(&item_id).await? else {
        return Ok(None);
    };
    let rate_table = rates.current_rates().await;
    Ok(Some(normalize_product(&raw, &rate_table)))
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
