use serde_json::{Map, Value};

use crate::parse_helpers::{count_from_value, digits_to_count};
use crate::types::{configurations, featured_values, field, objects, FeaturedValue, RawProduct};

/// Units sold, `0` when the record says nothing.
///
/// Resolution order:
/// 1. promotions: `SalesCount`, then a sales featured value inside the promotion
/// 2. the record's own sales featured value
/// 3. sum of `SalesCount` (or `Volume`) across variant configurations
/// 4. top-level `SalesCount`, then `Volume`
#[must_use]
pub fn extract_sales_count(product: &RawProduct) -> u64 {
    let record = product.fields();
    promotion_sales(record)
        .or_else(|| featured_sales(&featured_values(record)))
        .or_else(|| configuration_sales(record))
        .or_else(|| direct_sales(record))
        .unwrap_or(0)
}

fn is_sales_entry(fv: &FeaturedValue) -> bool {
    fv.name_lower().contains("sales")
}

/// Reads the first sales entry. Its digits win even when they read `0`;
/// an entry without digits defers to the next source.
fn featured_sales(fvs: &[FeaturedValue]) -> Option<u64> {
    fvs.iter()
        .find(|fv| is_sales_entry(fv))
        .and_then(|fv| digits_to_count(&fv.value))
}

fn promotion_sales(record: &Map<String, Value>) -> Option<u64> {
    objects(record, "Promotions").find_map(|promo| {
        field(promo, "SalesCount")
            .and_then(count_from_value)
            .filter(|n| *n > 0)
            .or_else(|| featured_sales(&featured_values(promo)).filter(|n| *n > 0))
    })
}

fn configuration_sales(record: &Map<String, Value>) -> Option<u64> {
    let total = configurations(record)
        .into_iter()
        .map(|config| direct_sales(config).unwrap_or(0))
        .fold(0u64, u64::saturating_add);
    (total > 0).then_some(total)
}

fn direct_sales(record: &Map<String, Value>) -> Option<u64> {
    positive_count(record, "SalesCount").or_else(|| positive_count(record, "Volume"))
}

fn positive_count(record: &Map<String, Value>, key: &str) -> Option<u64> {
    field(record, key)
        .and_then(count_from_value)
        .filter(|n| *n > 0)
}
