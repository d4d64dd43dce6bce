//! Phonation inputs for the Dysphonia Severity Index
//!
//! - MPT: longest continuous vocalization (s)
//! - I-Low: quietest vocalized intensity (dB SPL)

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::features::{FeatureSet, StatKind};
use contour::CleanContour;
use safe_stats::{finite_or, safe_log10, safe_max, safe_median, safe_percentile, safe_ratio};
use tracing::debug;

/// Maximum phonation time and lowest vocal intensity from an intensity contour (Pa)
pub fn aggregate_phonation(
    intensity: &CleanContour,
    config: &FeatureConfig,
) -> Result<FeatureSet, FeatureError> {
    let values = intensity.values();
    let peak = safe_max(values, 0.0);
    let vocal_floor = config.vocal_threshold_ratio * peak;

    // adaptive threshold: relative to the peak, but never below half the median
    let threshold = vocal_floor.max(0.5 * safe_median(values, 0.0));
    let longest = intensity
        .runs_where(|v| v >= threshold)
        .into_iter()
        .map(|(_, len)| len)
        .max()
        .unwrap_or(0);

    let mpt_sec = if longest > 0 {
        longest as f64 * intensity.hop_seconds()
    } else {
        intensity.duration_seconds()
    };

    let vocal: Vec<f64> = values.iter().copied().filter(|&v| v >= vocal_floor).collect();
    let quietest = safe_percentile(&vocal, config.i_low_percentile, 0.0)?;
    let i_low_db = if quietest > 0.0 {
        let relative = safe_ratio(quietest, config.intensity_reference_pa, 0.0);
        20.0 * safe_log10(relative, config.log_floor)
    } else {
        0.0
    };

    debug!(
        "Phonation: longest run {} frames, threshold {:.3e}",
        longest, threshold
    );

    let mut features = FeatureSet::new();
    features.insert("mpt_sec", StatKind::Duration, finite_or(mpt_sec, 0.0));
    features.insert("i_low_db", StatKind::Level, finite_or(i_low_db, 0.0));
    Ok(features)
}
