//! Energy / Loudness Statistics

use crate::config::FeatureConfig;
use crate::features::{FeatureSet, StatKind};
use contour::CleanContour;
use safe_stats::{finite_or, safe_log10, safe_mean, Summary};

/// Convert linear RMS frames to dB.
///
/// Each frame is clamped by `safe_log10` before any averaging, so a silent
/// frame contributes the floor level rather than `-inf`.
pub fn to_decibels(rms: &[f64], log_floor: f64) -> Vec<f64> {
    rms.iter()
        .map(|&r| 20.0 * safe_log10(r, log_floor))
        .filter(|db| db.is_finite())
        .collect()
}

/// Loudness level and variation from a cleaned RMS contour
pub fn aggregate_energy(rms: &CleanContour, config: &FeatureConfig) -> FeatureSet {
    let db = to_decibels(rms.values(), config.log_floor);
    let stats = Summary::compute(&db);

    let mut features = FeatureSet::new();
    features.insert("rms_mean", StatKind::Mean, safe_mean(rms.values(), 0.0));
    features.insert("amplitude_db_mean", StatKind::Level, finite_or(stats.mean, 0.0));
    features.insert("amplitude_db_variation", StatKind::Std, finite_or(stats.std_dev, 0.0));
    features.insert("amplitude_db_range", StatKind::Range, stats.range());
    features
}
