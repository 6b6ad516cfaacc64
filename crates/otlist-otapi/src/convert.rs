//! Currency conversion and shipping metrics.

use otlist_core::{Dimensions, RateTable};

use crate::parse_helpers::round_to;

/// Air-freight volumetric divisor, cm³ per kilogram.
pub const VOLUMETRIC_DIVISOR: f64 = 6000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertedPrices {
    pub usd: f64,
    pub cop: f64,
}

/// Converts a CNY amount with the given rates.
///
/// Non-positive or non-finite amounts and rates convert to `0.0`, so the
/// output is never negative or NaN.
#[must_use]
pub fn convert_currency(amount_cny: f64, rates: &RateTable) -> ConvertedPrices {
    ConvertedPrices {
        usd: apply_rate(amount_cny, rates.usd),
        cop: apply_rate(amount_cny, rates.cop),
    }
}

fn apply_rate(amount: f64, rate: f64) -> f64 {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(amount) && valid(rate) {
        amount * rate
    } else {
        0.0
    }
}

/// Dimensional weight in kilograms, rounded to two decimals.
///
/// `None` unless all three axes are present and at least
/// [`Dimensions::MIN_VALID_CM`].
#[must_use]
pub fn volumetric_weight_kg(dims: &Dimensions) -> Option<f64> {
    let (length, width, height) = dims.complete()?;
    if [length, width, height]
        .iter()
        .any(|v| *v < Dimensions::MIN_VALID_CM)
    {
        return None;
    }
    Some(round_to(length * width * height / VOLUMETRIC_DIVISOR, 2))
}
