//! Feature Engine Error Types

use contour::ContourError;
use safe_stats::ReductionError;
use thiserror::Error;

/// Errors from feature extraction.
///
/// Every variant is a configuration or argument problem. Silent, unvoiced
/// or very short recordings produce fallback values, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Configuration value outside its domain
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Reduction primitive rejected an argument
    #[error(transparent)]
    Reduction(#[from] ReductionError),

    /// Contour construction rejected an argument
    #[error(transparent)]
    Contour(#[from] ContourError),
}
