//! Client, field extraction, and listing pipeline for the OTAPI marketplace
//! aggregation service.
//!
//! The crate is organised bottom-up: [`extract`] reads individual fields
//! out of loosely-typed upstream records, [`normalize`] assembles them into
//! a [`CanonicalProduct`](otlist_core::CanonicalProduct), [`search`] drives
//! batched category searches with per-item enrichment, and [`listing`] turns
//! the result into the public response envelope.

pub mod categories;
pub mod client;
pub mod convert;
pub mod error;
pub mod extract;
pub mod listing;
pub mod normalize;
pub(crate) mod parse_helpers;
pub(crate) mod retry;
pub mod search;
pub mod types;

pub use categories::{Category, CategoryEnvelope, CategoryShape};
pub use client::{OtapiClient, OtapiSession, OtapiTimeouts, RetryPolicy};
pub use convert::{convert_currency, volumetric_weight_kg, ConvertedPrices};
pub use error::OtapiError;
pub use listing::{
    get_single_item_detail, list_category_products, ListingError, ListingParams, ListingRequest,
};
pub use normalize::normalize_product;
pub use search::{CatalogSource, SearchBatch, SearchOrchestrator, SearchOutcome};
pub use types::{ErrorCode, RawProduct};
