//! Reduction Error Types

use thiserror::Error;

/// Errors raised by the reduction primitives.
///
/// Only caller misuse is reported here. Empty or degenerate data is
/// handled through fallback values and never produces an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReductionError {
    /// Argument outside its documented domain
    #[error("invalid argument {name} = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
