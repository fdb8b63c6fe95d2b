use crate::{Error, Result};
use std::cmp::Ordering;

/// Linear-interpolated percentile of `values`.
///
/// Values are sorted ascending and the fractional rank `(p / 100) * (n - 1)`
/// is computed. An integral rank selects that element directly, otherwise the
/// result is interpolated between the floor and ceiling elements. Empty input
/// yields `0.0`.
pub fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(Error::InvalidPercentile(pct));
    }

    if values.is_empty() {
        return Ok(0.0);
    }

    if !values.iter().all(|v| v.is_finite()) {
        return Err(Error::NonFiniteSample);
    }

    let mut sorted_values = values.to_vec();
    sorted_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = (pct / 100.0) * (sorted_values.len() - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    let lower = sorted_values[lower_idx];
    if lower_idx == upper_idx {
        return Ok(lower);
    }

    let upper = sorted_values[upper_idx];
    Ok(lower + (upper - lower) * (rank - rank.floor()))
}

/// Arithmetic mean, `0.0` for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to `decimals` places, exact ties go to the even neighbour.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
