use serde::{Deserialize, Serialize};

/// Base currency of every upstream price.
pub const BASE_CURRENCY: &str = "CNY";

/// A marketplace product normalized from one upstream record.
///
/// Field names serialize in the upstream's PascalCase convention so that
/// browser clients built against the marketplace API can consume listings
/// without a second mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CanonicalProduct {
    pub item_id: String,
    /// Never empty; a placeholder is used when the upstream sends no title.
    pub title: String,
    pub image_url: String,
    pub item_url: String,
    /// Same value as `price_rmb`, kept for clients that read `Price`.
    pub price: f64,
    #[serde(rename = "PriceRMB")]
    pub price_rmb: f64,
    #[serde(rename = "PriceUSD")]
    pub price_usd: f64,
    #[serde(rename = "PriceCOP")]
    pub price_cop: f64,
    pub currency: String,
    pub sales_count: u64,
    /// 0–5 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    /// Upstream format preserved as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_unit: Option<String>,
    /// Air-freight dimensional weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumetric_weight: Option<f64>,
    /// 0–5 scale, one decimal when rescaled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_count: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "g")]
    Grams,
}

impl WeightUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Grams => "g",
        }
    }
}

/// A resolved product weight. `value` is always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

/// Resolved physical dimensions in centimeters.
///
/// Each present value is at least [`Dimensions::MIN_VALID_CM`]; smaller
/// readings are discarded during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Dimensions {
    pub const MIN_VALID_CM: f64 = 3.0;
    pub const UNIT: &'static str = "cm";

    /// Returns `true` if none of the three values are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Returns `(length, width, height)` when all three are present.
    #[must_use]
    pub fn complete(&self) -> Option<(f64, f64, f64)> {
        Some((self.length?, self.width?, self.height?))
    }
}
