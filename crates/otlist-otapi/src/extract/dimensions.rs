//! Physical dimension extraction.
//!
//! Four sources are merged in priority order. A later source only fills an
//! axis the earlier ones left empty, and any reading below
//! [`Dimensions::MIN_VALID_CM`] is discarded on the spot so it never blocks
//! a valid value further down the chain.

use std::sync::LazyLock;

use otlist_core::Dimensions;
use regex::Regex;
use serde_json::{Map, Value};

use crate::parse_helpers::{number_from_value, parse_number};
use crate::types::{featured_values, field, objects, scalar_text, text_field, FeaturedValue, RawProduct};

/// `30x20x10`, `30 × 20 × 10 cm`, `30cm*20cm*10cm`.
static COMBINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:[.,]\d+)?)\s*(?:cm)?\s*[x×*]\s*(\d+(?:[.,]\d+)?)\s*(?:cm)?\s*[x×*]\s*(\d+(?:[.,]\d+)?)",
    )
    .expect("valid combined dimensions regex")
});

/// A value that is only a number, optionally in centimeters.
static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\d+(?:[.,]\d+)?\s*(?:cm)?\s*$").expect("valid bare number regex")
});

/// Apparel size codes: `S`, `XL`, `3XL`, `38码`.
static SIZE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:xxs|xs|s|m|l|xl|xxl|xxxl|[2-6]xl)\b|\d+\s*码")
        .expect("valid size code regex")
});

/// Bracketed annotations, ASCII or full-width.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[(\[（【].*[)\]）】]").expect("valid bracketed text regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Length,
    Width,
    Height,
}

/// Names and keys that point at a combined dimension reading.
const DIMENSION_KEYWORDS: [&str; 10] = [
    "dimension",
    "dimensión",
    "medida",
    "tamaño",
    "package",
    "paquete",
    "embalaje",
    "尺寸",
    "包装",
    "长宽高",
];

const FLAT_KEYS: [(Axis, [&str; 3]); 3] = [
    (Axis::Length, ["length", "itemlength", "packagelength"]),
    (Axis::Width, ["width", "itemwidth", "packagewidth"]),
    (Axis::Height, ["height", "itemheight", "packageheight"]),
];

/// Length, width, and height in centimeters, or `None` when no axis has a
/// valid reading.
///
/// Resolution order: `PhysicalParameters` → flat `Length`/`ItemLength`/
/// `PackageLength` style keys → featured values → the `Attributes` list.
#[must_use]
pub fn extract_dimensions(product: &RawProduct) -> Option<Dimensions> {
    let record = product.fields();
    let mut dims = Dimensions::default();

    if let Some(params) = field(record, "PhysicalParameters") {
        from_physical_parameters(params, &mut dims);
    }
    from_flat_keys(record, &mut dims);
    from_featured_values(&featured_values(record), &mut dims);
    from_attributes(record, &mut dims);

    (!dims.is_empty()).then_some(dims)
}

fn slot(dims: &mut Dimensions, axis: Axis) -> &mut Option<f64> {
    match axis {
        Axis::Length => &mut dims.length,
        Axis::Width => &mut dims.width,
        Axis::Height => &mut dims.height,
    }
}

/// Fills `axis` if it is still empty and the reading is valid.
fn offer(dims: &mut Dimensions, axis: Axis, reading: Option<f64>) {
    let target = slot(dims, axis);
    if target.is_none() {
        *target = reading.filter(|v| *v >= Dimensions::MIN_VALID_CM);
    }
}

fn offer_combined(dims: &mut Dimensions, text: &str) -> bool {
    let Some(caps) = COMBINED.captures(text) else {
        return false;
    };
    for (index, axis) in [Axis::Length, Axis::Width, Axis::Height].into_iter().enumerate() {
        let reading = caps.get(index + 1).and_then(|m| parse_number(m.as_str()));
        offer(dims, axis, reading);
    }
    true
}

/// Matches English and Spanish axis names by substring.
fn axis_for_name(lower: &str) -> Option<Axis> {
    if lower.contains("length") || lower.contains("largo") || lower.contains("longitud") {
        Some(Axis::Length)
    } else if lower.contains("width") || lower.contains("anch") {
        Some(Axis::Width)
    } else if lower.contains("height") || lower.contains("alto") || lower.contains("altur") {
        Some(Axis::Height)
    } else {
        None
    }
}

/// Adds the Chinese single-character axis names used in attribute rows.
fn axis_for_attribute(lower: &str) -> Option<Axis> {
    axis_for_name(lower).or_else(|| {
        if lower.contains('长') {
            Some(Axis::Length)
        } else if lower.contains('宽') {
            Some(Axis::Width)
        } else if lower.contains('高') {
            Some(Axis::Height)
        } else {
            None
        }
    })
}

fn is_dimension_name(lower: &str) -> bool {
    !lower.contains("weight")
        && !lower.contains("peso")
        && DIMENSION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn from_physical_parameters(params: &Value, dims: &mut Dimensions) {
    match params {
        Value::Array(entries) => {
            for entry in entries.iter().filter_map(Value::as_object) {
                let Some(name) = text_field(entry, "Name").or_else(|| text_field(entry, "name"))
                else {
                    continue;
                };
                let Some(axis) = axis_for_name(&name.to_lowercase()) else {
                    continue;
                };
                let reading = field(entry, "Value")
                    .or_else(|| field(entry, "value"))
                    .and_then(number_from_value);
                offer(dims, axis, reading);
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                if let Some(axis) = axis_for_name(&key.to_lowercase()) {
                    offer(dims, axis, number_from_value(value));
                }
            }
        }
        _ => {}
    }
}

fn from_flat_keys(record: &Map<String, Value>, dims: &mut Dimensions) {
    for (axis, candidates) in FLAT_KEYS {
        for candidate in candidates {
            let reading = record
                .iter()
                .find(|(key, _)| normalize_key(key) == candidate)
                .and_then(|(_, value)| number_from_value(value));
            offer(dims, axis, reading);
        }
    }
}

/// `Package_Length`, `item-length`, and `ItemLength` all become `itemlength`.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn from_featured_values(fvs: &[FeaturedValue], dims: &mut Dimensions) {
    for fv in fvs {
        if offer_combined(dims, &fv.value) {
            continue;
        }
        let name = fv.name_lower();
        if let Some(axis) = axis_for_name(&name) {
            offer(dims, axis, parse_number(&fv.value));
        } else if is_dimension_name(&name) && dims.is_empty() && BARE_NUMBER.is_match(&fv.value) {
            let reading = parse_number(&fv.value);
            for axis in [Axis::Length, Axis::Width, Axis::Height] {
                offer(dims, axis, reading);
            }
        }
    }
}

/// Size charts for apparel reuse dimension words; skip rows that read like
/// a size label rather than a measurement.
fn looks_like_size_label(value: &str) -> bool {
    value.to_lowercase().contains("inch") || SIZE_CODE.is_match(value) || BRACKETED.is_match(value)
}

fn from_attributes(record: &Map<String, Value>, dims: &mut Dimensions) {
    for attr in objects(record, "Attributes") {
        let Some(value) = field(attr, "Value")
            .or_else(|| field(attr, "OriginalValue"))
            .and_then(scalar_text)
        else {
            continue;
        };
        if looks_like_size_label(&value) {
            continue;
        }
        for name_key in ["PropertyName", "OriginalPropertyName"] {
            let Some(name) = text_field(attr, name_key).map(str::to_lowercase) else {
                continue;
            };
            if is_dimension_name(&name) && offer_combined(dims, &value) {
                break;
            }
            if let Some(axis) = axis_for_attribute(&name) {
                offer(dims, axis, parse_number(&value));
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "dimensions_test.rs"]
mod tests;
