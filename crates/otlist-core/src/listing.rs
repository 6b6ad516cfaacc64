use serde::{Deserialize, Serialize};

use crate::products::CanonicalProduct;

/// Application-level success code used by the marketplace API and echoed in
/// every successful envelope.
pub const SUCCESS_CODE: &str = "Ok";

/// Requested ordering of a category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    BestSellers,
    PriceAsc,
    PriceDesc,
    Newest,
    /// Any code the API does not know; ordered like best sellers upstream,
    /// but never re-sorted locally.
    Unrecognized,
}

impl SortMode {
    /// Parses a sort code. Accepts the marketplace codes (`Ranksales`,
    /// `Rankprice_asc`, `Rankprice_desc`, `Ranknew`) and kebab-case aliases.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "Ranksales" | "best-sellers" => SortMode::BestSellers,
            "Rankprice_asc" | "price-asc" => SortMode::PriceAsc,
            "Rankprice_desc" | "price-desc" => SortMode::PriceDesc,
            "Ranknew" | "newest" => SortMode::Newest,
            _ => SortMode::Unrecognized,
        }
    }

    /// Upstream `OrderBy` expression for this mode.
    #[must_use]
    pub fn order_expression(self) -> &'static str {
        match self {
            SortMode::BestSellers | SortMode::Unrecognized => "Volume:Desc",
            SortMode::PriceAsc => "Price:Asc",
            SortMode::PriceDesc => "Price:Desc",
            SortMode::Newest => "CreatedTime:Desc",
        }
    }
}

/// Response envelope of a category listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListingEnvelope {
    pub error_code: String,
    pub content: Vec<CanonicalProduct>,
    /// Upstream category match count, not the number of items returned.
    pub total_count: u64,
    pub request_id: String,
    /// Epoch milliseconds.
    pub request_time: i64,
}
