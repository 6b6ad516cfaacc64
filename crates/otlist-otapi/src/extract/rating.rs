use serde_json::{Map, Value};

use crate::parse_helpers::{number_from_value, parse_number, positive, round_to};
use crate::types::{featured_values, field, objects, FeaturedValue, RawProduct};

const MAX_STARS: f64 = 5.0;

/// Direct rating fields, most specific first.
const RATING_FIELDS: [&str; 3] = ["Rating", "ItemRating", "AverageRating"];

/// Product rating on a 0–5 scale.
///
/// Promotions are consulted first (direct fields, then featured values),
/// then the record's featured values, then its direct fields. Only positive
/// readings are accepted.
#[must_use]
pub fn extract_rating(product: &RawProduct) -> Option<f64> {
    let record = product.fields();
    objects(record, "Promotions")
        .find_map(|promo| direct_rating(promo).or_else(|| featured_rating(&featured_values(promo))))
        .or_else(|| featured_rating(&featured_values(record)))
        .or_else(|| direct_rating(record))
}

fn is_rating_entry(fv: &FeaturedValue) -> bool {
    fv.name == "normalizedRating" || fv.name_lower().contains("rating")
}

/// Featured ratings come as a 0–1 fraction, a 0–5 score, or a 0–100
/// percentage.
fn featured_rating(fvs: &[FeaturedValue]) -> Option<f64> {
    let raw = fvs
        .iter()
        .find(|fv| is_rating_entry(fv))
        .and_then(|fv| parse_number(&fv.value))
        .and_then(positive)?;
    let stars = if raw <= 1.0 {
        raw * MAX_STARS
    } else if raw <= MAX_STARS {
        raw
    } else {
        raw / 20.0
    };
    Some(stars.min(MAX_STARS))
}

/// Direct ratings are either a 0–5 score or a 0–100 percentage.
fn direct_rating(record: &Map<String, Value>) -> Option<f64> {
    RATING_FIELDS
        .iter()
        .find_map(|key| field(record, key).and_then(number_from_value).and_then(positive))
        .map(|raw| if raw > MAX_STARS { (raw / 20.0).min(MAX_STARS) } else { raw })
}

/// Seller reputation on a 0–5 scale.
///
/// Reads `VendorScore` / `VendorRating`, then a featured value whose name
/// mentions both "vendor" and "rating", then one named `sellerRating`.
/// Values above 5 are treated as percentages and rescaled to one decimal.
#[must_use]
pub fn extract_seller_rating(product: &RawProduct) -> Option<f64> {
    let record = product.fields();
    let direct = ["VendorScore", "VendorRating"]
        .iter()
        .find_map(|key| field(record, key).and_then(number_from_value).and_then(positive));
    direct
        .or_else(|| {
            let fvs = featured_values(record);
            let vendor_entry = fvs.iter().find(|fv| {
                let name = fv.name_lower();
                name.contains("vendor") && name.contains("rating")
            });
            vendor_entry
                .or_else(|| fvs.iter().find(|fv| fv.name.eq_ignore_ascii_case("sellerRating")))
                .and_then(|fv| parse_number(&fv.value))
                .and_then(positive)
        })
        .map(rescale_seller_score)
}

fn rescale_seller_score(raw: f64) -> f64 {
    if raw > MAX_STARS {
        round_to(raw / 20.0, 1).min(MAX_STARS)
    } else {
        raw
    }
}
