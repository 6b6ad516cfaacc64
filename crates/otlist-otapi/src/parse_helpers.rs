//! Tolerant numeric parsing shared by the field extractors.
//!
//! Upstream values arrive as JSON numbers, plain numeric strings, or
//! free-form text such as `"1,5 kg"` or `"约 2.3 kg"`. Every extractor goes
//! through these helpers so the separator rules live in one place.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// First numeric run in a string: a digit followed by digits and separators.
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d[\d.,]*").expect("valid number token regex"));

/// A digit followed by a kilogram or gram unit. `kg` is tried first.
static MASS_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d\s*(kg|g)").expect("valid mass unit regex"));

/// Parses the first number in `raw`.
///
/// Separator rules:
/// - both `.` and `,` present: the later one is the decimal separator
/// - only `,`: a single comma followed by exactly three digits is a
///   thousands grouping (`"1,500"`), unless the integer part is `0`;
///   otherwise it is a decimal comma (`"1,5"`)
/// - only `.`: a single dot is decimal, repeated dots are groupings
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let token = NUMBER_TOKEN.find(raw)?.as_str();
    let token = token.trim_end_matches(['.', ',']);
    normalize_separators(token)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn normalize_separators(token: &str) -> String {
    match (token.rfind('.'), token.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (grouping, decimal) = if dot > comma { (',', '.') } else { ('.', ',') };
            token
                .chars()
                .filter(|&ch| ch != grouping)
                .map(|ch| if ch == decimal { '.' } else { ch })
                .collect()
        }
        (None, Some(_)) => {
            let grouping = token.matches(',').count() > 1
                || token.rsplit_once(',').is_some_and(|(int_part, frac)| {
                    frac.len() == 3 && int_part.trim_start_matches('-') != "0"
                });
            if grouping {
                token.replace(',', "")
            } else {
                token.replace(',', ".")
            }
        }
        (Some(_), None) if token.matches('.').count() > 1 => token.replace('.', ""),
        _ => token.to_owned(),
    }
}

/// Reads a JSON number or a numeric string. Non-finite values yield `None`.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

pub(crate) fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

/// Reads a non-negative count, truncating any fractional part.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn count_from_value(value: &Value) -> Option<u64> {
    let n = number_from_value(value)?;
    (n >= 0.0).then(|| n.floor() as u64)
}

/// Keeps only ASCII digits and parses the result: `"月销 1,234+"` → 1234.
pub(crate) fn digits_to_count(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `true` when the first mass unit attached to a number is grams.
///
/// `"500g"`, `"500 gr"`, and `"500 gramos"` are grams; `"0.5kg"` and text
/// without a unit are not.
pub(crate) fn mentions_grams(text: &str) -> bool {
    MASS_UNIT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .is_some_and(|unit| unit.as_str().eq_ignore_ascii_case("g"))
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
