//! Articulation: pause ratio and approximate syllable rate

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::features::{FeatureSet, StatKind};
use contour::CleanContour;
use safe_stats::{safe_percentile, safe_ratio};

/// Pause ratio and speech rate from frame RMS.
///
/// Frames strictly above the configured RMS percentile count as speech.
/// Each speech/pause transition is taken as half a syllable.
pub fn aggregate_articulation(
    rms: &CleanContour,
    config: &FeatureConfig,
) -> Result<FeatureSet, FeatureError> {
    let values = rms.values();
    let threshold = safe_percentile(values, config.speech_percentile, 0.0)?;

    let speech: Vec<bool> = values.iter().map(|&v| v > threshold).collect();
    let transitions = speech.windows(2).filter(|w| w[0] != w[1]).count();
    let pauses = speech.iter().filter(|&&s| !s).count();

    let mut features = FeatureSet::new();
    features.insert(
        "pause_ratio",
        StatKind::Ratio,
        safe_ratio(pauses as f64, speech.len() as f64, 0.0),
    );
    features.insert(
        "rate_syl_sec",
        StatKind::Rate,
        safe_ratio(transitions as f64 / 2.0, rms.duration_seconds(), 0.0),
    );
    Ok(features)
}
