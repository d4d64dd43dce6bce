//! Contour Error Types

use thiserror::Error;

/// Errors raised while building contours or cleaning ranges.
///
/// These report malformed arguments from the caller. Undefined or
/// implausible frames are dropped by the cleaner and never raise.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContourError {
    /// Frame hop must be a positive finite number of seconds
    #[error("invalid frame hop {0} s: must be finite and > 0")]
    InvalidHop(f64),

    /// Range bounds are NaN or inverted
    #[error("invalid plausible range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    /// Frame index beyond the declared frame count
    #[error("frame index {index} out of bounds for {frame_count} frames")]
    FrameOutOfBounds { index: usize, frame_count: usize },

    /// Same frame index supplied twice
    #[error("duplicate frame index {0}")]
    DuplicateFrame(usize),
}
