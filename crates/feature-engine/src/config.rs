//! Feature extraction configuration

use crate::error::FeatureError;
use crate::sanitizer::Placeholder;
use contour::CleaningConfig;
use safe_stats::DEFAULT_LOG_FLOOR;
use serde::{Deserialize, Serialize};

/// Feature extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Plausible ranges applied by the contour cleaner
    pub cleaning: CleaningConfig,

    /// Low/high pitch percentiles reported as `f0_p{q}_hz`
    pub pitch_percentiles: (f64, f64),

    /// Percentile reported as F0-High
    pub f0_high_percentile: f64,

    /// Upper cap for shimmer (%); larger values indicate estimation error
    pub shimmer_ceiling_percent: f64,

    /// HNR reported when no frame has a positive HNR (dB)
    pub hnr_fallback_db: f64,

    /// Floor applied before every log10
    pub log_floor: f64,

    /// RMS percentile separating speech from pause frames
    pub speech_percentile: f64,

    /// Fraction of peak intensity counted as vocalization
    pub vocal_threshold_ratio: f64,

    /// Percentile of vocal intensity reported as I-Low
    pub i_low_percentile: f64,

    /// Reference pressure for intensity dB conversion (Pa)
    pub intensity_reference_pa: f64,

    /// Substitute for non-finite values at the output gate
    pub placeholder: Placeholder,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            cleaning: CleaningConfig::default(),
            pitch_percentiles: (2.0, 98.0),
            f0_high_percentile: 95.0,
            shimmer_ceiling_percent: 50.0,
            hnr_fallback_db: 10.0,
            log_floor: DEFAULT_LOG_FLOOR,
            speech_percentile: 20.0,
            vocal_threshold_ratio: 0.2,
            i_low_percentile: 5.0,
            intensity_reference_pa: 2e-5,
            placeholder: Placeholder::Zero,
        }
    }
}

impl FeatureConfig {
    /// Configuration that reports undefined values as `null` instead of `0.0`
    pub fn null_placeholder() -> Self {
        Self {
            placeholder: Placeholder::Null,
            ..Default::default()
        }
    }

    /// Check every value against its domain
    pub fn validate(&self) -> Result<(), FeatureError> {
        let percentiles = [
            ("pitch_percentiles.0", self.pitch_percentiles.0),
            ("pitch_percentiles.1", self.pitch_percentiles.1),
            ("f0_high_percentile", self.f0_high_percentile),
            ("speech_percentile", self.speech_percentile),
            ("i_low_percentile", self.i_low_percentile),
        ];
        for (name, q) in percentiles {
            if !(0.0..=100.0).contains(&q) {
                return Err(FeatureError::InvalidArgument {
                    name,
                    reason: format!("percentile {} outside [0, 100]", q),
                });
            }
        }

        // each pitch percentile is reported under its own `f0_p{q}_hz` key
        let (low_q, high_q) = self.pitch_percentiles;
        if low_q >= high_q {
            return Err(FeatureError::InvalidArgument {
                name: "pitch_percentiles",
                reason: format!("low {} must be below high {}", low_q, high_q),
            });
        }

        let positive = [
            ("shimmer_ceiling_percent", self.shimmer_ceiling_percent),
            ("log_floor", self.log_floor),
            ("intensity_reference_pa", self.intensity_reference_pa),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FeatureError::InvalidArgument {
                    name,
                    reason: format!("{} must be finite and > 0", value),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.vocal_threshold_ratio) {
            return Err(FeatureError::InvalidArgument {
                name: "vocal_threshold_ratio",
                reason: format!("{} outside [0, 1]", self.vocal_threshold_ratio),
            });
        }
        if !self.hnr_fallback_db.is_finite() {
            return Err(FeatureError::InvalidArgument {
                name: "hnr_fallback_db",
                reason: "must be finite".to_string(),
            });
        }
        if let Placeholder::Value(v) = self.placeholder {
            if !v.is_finite() {
                return Err(FeatureError::InvalidArgument {
                    name: "placeholder",
                    reason: "placeholder value must be finite".to_string(),
                });
            }
        }
        Ok(())
    }
}
