//! Pitch Statistics

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::features::{FeatureSet, StatKind};
use contour::CleanContour;
use safe_stats::{finite_or, safe_percentile, Summary};
use tracing::debug;

/// Summarize a cleaned F0 contour (Hz).
///
/// An empty contour yields `0.0` for every statistic. Callers tell "no
/// voiced signal" apart from a real zero through `voiced_fraction`.
pub fn aggregate_pitch(
    pitch: &CleanContour,
    config: &FeatureConfig,
) -> Result<FeatureSet, FeatureError> {
    let values = pitch.values();
    let stats = Summary::compute(values);
    let (low_q, high_q) = config.pitch_percentiles;

    let mut features = FeatureSet::new();
    features.insert("f0_mean_hz", StatKind::Mean, finite_or(stats.mean, 0.0));
    features.insert("f0_sd_hz", StatKind::Std, finite_or(stats.std_dev, 0.0));
    features.insert("f0_min_hz", StatKind::Min, finite_or(stats.min, 0.0));
    features.insert("f0_max_hz", StatKind::Max, finite_or(stats.max, 0.0));
    features.insert(
        format!("f0_p{}_hz", low_q),
        StatKind::Percentile,
        finite_or(safe_percentile(values, low_q, 0.0)?, 0.0),
    );
    features.insert(
        format!("f0_p{}_hz", high_q),
        StatKind::Percentile,
        finite_or(safe_percentile(values, high_q, 0.0)?, 0.0),
    );
    features.insert(
        "f0_high_hz",
        StatKind::Percentile,
        finite_or(safe_percentile(values, config.f0_high_percentile, 0.0)?, 0.0),
    );
    features.insert("voiced_fraction", StatKind::Ratio, finite_or(pitch.coverage(), 0.0));
    features.insert("voiced_frames", StatKind::Count, pitch.len() as f64);

    debug!(
        "Pitch: {} voiced of {} frames, mean {:.1} Hz",
        pitch.len(),
        pitch.original_count(),
        stats.mean
    );

    Ok(features)
}
