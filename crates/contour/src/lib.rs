//! Voice Measurement Contours
//!
//! Per-frame measurement sequences as delivered by the extraction
//! collaborator, and the cleaner that reduces them to finite, physically
//! plausible values while keeping track of how many frames were dropped.

mod cleaner;
mod error;
mod range;
mod raw;

pub use cleaner::{clean, CleanContour};
pub use error::ContourError;
pub use range::{CleaningConfig, PlausibleRange};
pub use raw::{RawContour, Sentinel};
