//! Sanitized Reduction Library
//!
//! Statistical primitives with an explicit fallback for every degenerate
//! input (empty slice, single value, zero denominator, log of zero).
//! Given finite inputs, no function in this crate returns NaN or infinity.

mod error;
mod reduce;
mod summary;

pub use error::ReductionError;
pub use reduce::{
    checked_ratio, finite_or, mean_abs_diff, safe_log10, safe_max, safe_mean, safe_median,
    safe_min, safe_percentile, safe_ratio, safe_ratio_eps, safe_std,
};
pub use summary::Summary;

/// Fallback used by callers that have no better substitute
pub const DEFAULT_FALLBACK: f64 = 0.0;

/// Denominators with magnitude at or below this are treated as zero
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Smallest argument passed to `log10`
pub const DEFAULT_LOG_FLOOR: f64 = 1e-10;
