use std::sync::LazyLock;

use otlist_core::{Weight, WeightUnit};
use regex::Regex;
use serde_json::{Map, Value};

use crate::parse_helpers::{mentions_grams, number_from_value, parse_number, positive};
use crate::types::{featured_values, field, objects, text_field, FeaturedValue, RawProduct};

/// A featured value that is nothing but a number and a mass unit.
static WEIGHT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\d+(?:[.,]\d+)?\s*(?:kg|kgs|kilos?|kilogram(?:o)?s?|g|gr|grs|gram(?:o)?s?)\s*$",
    )
    .expect("valid weight value regex")
});

/// Product weight, kilograms unless the source says grams.
///
/// Resolution order: `ActualWeightInfo` → first `WeightInfos` entry →
/// `Weight` / `GrossWeight` / `ItemWeight` → a featured value named like a
/// weight or shaped like one.
#[must_use]
pub fn extract_weight(product: &RawProduct) -> Option<Weight> {
    let record = product.fields();
    field(record, "ActualWeightInfo")
        .and_then(Value::as_object)
        .and_then(weight_from_info)
        .or_else(|| objects(record, "WeightInfos").next().and_then(weight_from_info))
        .or_else(|| {
            ["Weight", "GrossWeight", "ItemWeight"]
                .iter()
                .find_map(|key| field(record, key).and_then(weight_from_value))
        })
        .or_else(|| featured_weight(&featured_values(record)))
}

/// Weight-info objects carry the amount under `Weight` and sometimes spell
/// out the unit separately.
fn weight_from_info(info: &Map<String, Value>) -> Option<Weight> {
    let mut weight = field(info, "Weight").and_then(weight_from_value)?;
    let declared_grams = ["Unit", "WeightUnit"]
        .iter()
        .filter_map(|key| text_field(info, key))
        .any(|unit| matches!(unit.to_lowercase().as_str(), "g" | "gr" | "gram" | "grams" | "gramos"));
    if declared_grams {
        weight.unit = WeightUnit::Grams;
    }
    Some(weight)
}

fn weight_from_value(value: &Value) -> Option<Weight> {
    match value {
        Value::String(text) => weight_from_text(text),
        other => number_from_value(other).and_then(positive).map(|value| Weight {
            value,
            unit: WeightUnit::Kilograms,
        }),
    }
}

fn weight_from_text(text: &str) -> Option<Weight> {
    let value = parse_number(text).and_then(positive)?;
    let unit = if mentions_grams(text) {
        WeightUnit::Grams
    } else {
        WeightUnit::Kilograms
    };
    Some(Weight { value, unit })
}

fn featured_weight(fvs: &[FeaturedValue]) -> Option<Weight> {
    fvs.iter()
        .filter(|fv| fv.name_lower().contains("weight") || WEIGHT_VALUE.is_match(&fv.value))
        .find_map(|fv| weight_from_text(&fv.value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(value: Value) -> RawProduct {
        RawProduct::from_value(value).expect("object")
    }

    #[test]
    fn actual_weight_info_wins() {
        let p = product(json!({
            "ActualWeightInfo": {"Weight": 1.2},
            "WeightInfos": [{"Weight": 9}],
            "Weight": 3
        }));
        assert_eq!(
            extract_weight(&p),
            Some(Weight { value: 1.2, unit: WeightUnit::Kilograms })
        );
    }

    #[test]
    fn weight_info_list_uses_first_entry() {
        let p = product(json!({"WeightInfos": [{"Weight": "350", "Unit": "g"}, {"Weight": 2}]}));
        assert_eq!(
            extract_weight(&p),
            Some(Weight { value: 350.0, unit: WeightUnit::Grams })
        );
    }

    #[test]
    fn direct_fields_in_order() {
        let p = product(json!({"GrossWeight": "0,8 kg", "ItemWeight": 5}));
        assert_eq!(
            extract_weight(&p),
            Some(Weight { value: 0.8, unit: WeightUnit::Kilograms })
        );
    }

    #[test]
    fn featured_value_in_grams() {
        let p = product(json!({
            "FeaturedValues": [
                {"Name": "color", "Value": "red"},
                {"Name": "peso", "Value": "500g"}
            ]
        }));
        assert_eq!(
            extract_weight(&p),
            Some(Weight { value: 500.0, unit: WeightUnit::Grams })
        );
    }

    #[test]
    fn featured_value_named_weight() {
        let p = product(json!({"FeaturedValues": [{"Name": "itemWeight", "Value": "约 2.5"}]}));
        assert_eq!(
            extract_weight(&p),
            Some(Weight { value: 2.5, unit: WeightUnit::Kilograms })
        );
    }

    #[test]
    fn zero_weight_is_absent() {
        assert_eq!(extract_weight(&product(json!({"Weight": 0}))), None);
        assert_eq!(extract_weight(&product(json!({}))), None);
    }
}
