use serde_json::{Map, Value};

use crate::parse_helpers::{number_from_value, positive};
use crate::types::{configurations, field, objects, RawProduct};

/// Price in CNY, `0.0` when no positive price exists.
///
/// Resolution order:
/// 1. the first promotion carrying a positive price
/// 2. the cheapest positive price across variant configurations
/// 3. the top-level `Price`
#[must_use]
pub fn extract_price(product: &RawProduct) -> f64 {
    let record = product.fields();
    promotion_price(record)
        .or_else(|| cheapest_configuration(record))
        .or_else(|| field(record, "Price").and_then(money_amount))
        .unwrap_or(0.0)
}

/// A price is either a bare number or an object carrying `OriginalPrice`
/// and `MarginPrice`; the first positive amount wins.
fn money_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Object(price) => ["OriginalPrice", "MarginPrice"]
            .iter()
            .find_map(|key| field(price, key).and_then(number_from_value).and_then(positive)),
        other => number_from_value(other).and_then(positive),
    }
}

fn promotion_price(record: &Map<String, Value>) -> Option<f64> {
    objects(record, "Promotions")
        .find_map(|promo| field(promo, "Price").and_then(money_amount))
}

fn cheapest_configuration(record: &Map<String, Value>) -> Option<f64> {
    configurations(record)
        .into_iter()
        .filter_map(|config| {
            ["Price", "PriceRmb"]
                .iter()
                .find_map(|key| field(config, key).and_then(money_amount))
        })
        .min_by(f64::total_cmp)
}
