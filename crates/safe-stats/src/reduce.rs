//! Guarded Reduction Primitives

use crate::error::ReductionError;
use crate::{DEFAULT_EPSILON, DEFAULT_LOG_FLOOR};

/// Return `value` if it is finite, otherwise `fallback`.
///
/// Every aggregator runs its result through this before inserting it into
/// a feature set.
#[inline]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Arithmetic mean, or `fallback` for an empty slice or a non-finite result.
pub fn safe_mean(xs: &[f64], fallback: f64) -> f64 {
    if xs.is_empty() {
        return fallback;
    }
    finite_or(raw_mean(xs), fallback)
}

/// Mean of a non-empty slice.
///
/// A plain sum that overflows is redone on pre-scaled terms, so a large but
/// finite input still has a finite mean.
fn raw_mean(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let sum = xs.iter().sum::<f64>();
    if sum.is_finite() {
        sum / n
    } else {
        xs.iter().map(|&x| x / n).sum()
    }
}

/// Sample standard deviation (n - 1 denominator).
///
/// A single observation has zero spread and yields `0.0`; only the empty
/// slice yields `fallback`.
pub fn safe_std(xs: &[f64], fallback: f64) -> f64 {
    match xs.len() {
        0 => fallback,
        1 => 0.0,
        n => {
            let mean = raw_mean(xs);
            if !mean.is_finite() {
                return fallback;
            }
            // deviations are scaled by the largest one so squaring cannot overflow
            let scale = xs.iter().map(|&x| (x - mean).abs()).fold(0.0, f64::max);
            if scale == 0.0 {
                return 0.0;
            }
            let m2: f64 = xs
                .iter()
                .map(|&x| {
                    let d = (x - mean) / scale;
                    d * d
                })
                .sum();
            finite_or(scale * (m2 / (n - 1) as f64).sqrt(), fallback)
        }
    }
}

/// q-th percentile with linear interpolation between closest ranks.
///
/// `q` must lie in `[0, 100]`. Empty input returns `fallback`.
pub fn safe_percentile(xs: &[f64], q: f64, fallback: f64) -> Result<f64, ReductionError> {
    if q.is_nan() || !(0.0..=100.0).contains(&q) {
        return Err(ReductionError::InvalidArgument {
            name: "q",
            value: q,
            reason: "percentile must be within [0, 100]",
        });
    }
    if xs.is_empty() {
        return Ok(fallback);
    }
    let sorted = sorted_copy(xs);
    Ok(finite_or(interpolate(&sorted, q), fallback))
}

/// Median, or `fallback` for an empty slice.
pub fn safe_median(xs: &[f64], fallback: f64) -> f64 {
    if xs.is_empty() {
        return fallback;
    }
    let sorted = sorted_copy(xs);
    finite_or(interpolate(&sorted, 50.0), fallback)
}

/// Smallest value, or `fallback` for an empty slice.
pub fn safe_min(xs: &[f64], fallback: f64) -> f64 {
    match xs.iter().copied().reduce(f64::min) {
        Some(v) => finite_or(v, fallback),
        None => fallback,
    }
}

/// Largest value, or `fallback` for an empty slice.
pub fn safe_max(xs: &[f64], fallback: f64) -> f64 {
    match xs.iter().copied().reduce(f64::max) {
        Some(v) => finite_or(v, fallback),
        None => fallback,
    }
}

/// `numerator / denominator` when `|denominator| > epsilon` and the quotient
/// is finite, `None` otherwise.
#[inline]
pub fn checked_ratio(numerator: f64, denominator: f64, epsilon: f64) -> Option<f64> {
    if denominator.abs() > epsilon {
        let ratio = numerator / denominator;
        ratio.is_finite().then_some(ratio)
    } else {
        None
    }
}

/// Ratio guarded by [`DEFAULT_EPSILON`]. Never panics on a zero denominator.
#[inline]
pub fn safe_ratio(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    safe_ratio_eps(numerator, denominator, fallback, DEFAULT_EPSILON)
}

/// Ratio guarded by a caller-chosen epsilon.
#[inline]
pub fn safe_ratio_eps(numerator: f64, denominator: f64, fallback: f64, epsilon: f64) -> f64 {
    checked_ratio(numerator, denominator, epsilon).unwrap_or(fallback)
}

/// `log10(max(x, floor))`.
///
/// Zero, negative and NaN arguments are clamped to `floor`, so the result is
/// never `-inf`. A floor that is not a positive finite number is replaced
/// with [`DEFAULT_LOG_FLOOR`]. The upper range is not clamped.
#[inline]
pub fn safe_log10(x: f64, floor: f64) -> f64 {
    let floor = if floor.is_finite() && floor > 0.0 {
        floor
    } else {
        DEFAULT_LOG_FLOOR
    };
    // f64::max ignores a NaN operand
    x.max(floor).log10()
}

/// Mean absolute difference between consecutive values.
///
/// Fewer than two values have no consecutive pair and yield `fallback`.
pub fn mean_abs_diff(xs: &[f64], fallback: f64) -> f64 {
    if xs.len() < 2 {
        return fallback;
    }
    let diffs: Vec<f64> = xs.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    safe_mean(&diffs, fallback)
}

fn sorted_copy(xs: &[f64]) -> Vec<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linear interpolation on an ascending, non-empty slice.
fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
