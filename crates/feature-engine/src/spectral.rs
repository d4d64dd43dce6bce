//! Spectral Summary

use crate::config::FeatureConfig;
use crate::features::{FeatureSet, StatKind};
use contour::CleanContour;
use safe_stats::{finite_or, safe_mean, safe_ratio};

/// Cleaned per-frame spectral measurements
#[derive(Debug, Clone)]
pub struct SpectralInput {
    /// Spectral centroid (Hz)
    pub centroid: CleanContour,
    /// Spectral rolloff (Hz)
    pub rolloff: CleanContour,
    /// Harmonics-to-noise ratio (dB)
    pub hnr_db: CleanContour,
    /// Mean magnitude above 3 kHz
    pub high_band_magnitude: CleanContour,
    /// Mean magnitude over the whole band
    pub total_magnitude: CleanContour,
    /// First formant (Hz)
    pub f1: CleanContour,
    /// Second formant (Hz)
    pub f2: CleanContour,
}

/// Reduce per-frame spectral measurements to recording-level features.
///
/// Formant means are reported as null when no formant frame survived,
/// since a zero formant frequency is not a meaningful measurement.
pub fn aggregate_spectral(input: &SpectralInput, config: &FeatureConfig) -> FeatureSet {
    let mut features = FeatureSet::new();

    features.insert(
        "spectral_centroid_mean",
        StatKind::Mean,
        safe_mean(input.centroid.values(), 0.0),
    );
    features.insert(
        "spectral_rolloff_mean",
        StatKind::Mean,
        safe_mean(input.rolloff.values(), 0.0),
    );

    let turbulence = safe_ratio(
        safe_mean(input.high_band_magnitude.values(), 0.0),
        safe_mean(input.total_magnitude.values(), 0.0),
        0.0,
    );
    features.insert("turbulence_ratio", StatKind::Ratio, turbulence);

    let voiced_hnr: Vec<f64> = input
        .hnr_db
        .values()
        .iter()
        .copied()
        .filter(|&h| h > 0.0)
        .collect();
    features.insert(
        "hnr_db",
        StatKind::Level,
        finite_or(
            safe_mean(&voiced_hnr, config.hnr_fallback_db),
            config.hnr_fallback_db,
        ),
    );

    for (name, formant) in [("f1_mean_hz", &input.f1), ("f2_mean_hz", &input.f2)] {
        if formant.is_empty() {
            features.insert_absent(name, StatKind::Mean);
        } else {
            features.insert(name, StatKind::Mean, safe_mean(formant.values(), 0.0));
        }
    }
    features.insert("formant_frames", StatKind::Count, input.f1.len() as f64);

    features
}
