//! Plausibility Ranges for Contour Cleaning

use crate::error::ContourError;
use serde::{Deserialize, Serialize};

/// Closed interval `[low, high]` of physically plausible values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct PlausibleRange {
    low: f64,
    high: f64,
}

impl PlausibleRange {
    /// Create a range; bounds must be non-NaN with `low <= high`
    pub fn new(low: f64, high: f64) -> Result<Self, ContourError> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(ContourError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Range bounded only from below
    pub fn at_least(low: f64) -> Self {
        let low = if low.is_nan() { f64::MIN } else { low.min(f64::MAX) };
        Self { low, high: f64::MAX }
    }

    /// Lower bound
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Whether `value` lies within the closed interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl TryFrom<(f64, f64)> for PlausibleRange {
    type Error = ContourError;

    fn try_from((low, high): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

impl From<PlausibleRange> for (f64, f64) {
    fn from(range: PlausibleRange) -> Self {
        (range.low, range.high)
    }
}

/// Cleaning configuration, one range per measured quantity.
///
/// `None` keeps every finite frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Fundamental frequency (Hz)
    pub pitch_range: Option<PlausibleRange>,
    /// Intensity (Pa); silence is not a measurement
    pub intensity_range: Option<PlausibleRange>,
    /// Frame RMS (linear); silent frames are kept
    pub rms_range: Option<PlausibleRange>,
    /// Formant frequencies (Hz)
    pub formant_range: Option<PlausibleRange>,
    /// Spectral centroid / rolloff / band magnitudes
    pub spectral_range: Option<PlausibleRange>,
    /// Per-frame harmonics-to-noise ratio (dB)
    pub hnr_range: Option<PlausibleRange>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            pitch_range: Some(PlausibleRange { low: 50.0, high: 500.0 }),
            intensity_range: Some(PlausibleRange::at_least(f64::MIN_POSITIVE)),
            rms_range: Some(PlausibleRange::at_least(0.0)),
            formant_range: Some(PlausibleRange { low: 90.0, high: 8000.0 }),
            spectral_range: Some(PlausibleRange::at_least(0.0)),
            hnr_range: None,
        }
    }
}

impl CleaningConfig {
    /// Narrow pitch range for low voices
    pub fn low_voice() -> Self {
        Self {
            pitch_range: Some(PlausibleRange { low: 50.0, high: 300.0 }),
            ..Default::default()
        }
    }

    /// Wide pitch range for high voices and children
    pub fn high_voice() -> Self {
        Self {
            pitch_range: Some(PlausibleRange { low: 100.0, high: 800.0 }),
            ..Default::default()
        }
    }
}
