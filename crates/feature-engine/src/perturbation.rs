//! Jitter and Shimmer
//!
//! Frame-to-frame perturbation of the glottal period (jitter) and of the
//! amplitude (shimmer), both as a percentage of the mean.

use crate::config::FeatureConfig;
use crate::features::{FeatureSet, StatKind};
use contour::CleanContour;
use safe_stats::{checked_ratio, finite_or, mean_abs_diff, safe_mean, safe_ratio, DEFAULT_EPSILON};
use tracing::debug;

/// Convert F0 values to periods, dropping any frame whose period is unreliable
pub fn periods(pitch: &CleanContour) -> Vec<f64> {
    pitch
        .values()
        .iter()
        .filter_map(|&f0| checked_ratio(1.0, f0, DEFAULT_EPSILON))
        .collect()
}

/// Local perturbation: mean absolute consecutive difference over the mean, in %.
///
/// Fewer than two values yield `0.0`.
pub fn local_perturbation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean_diff = mean_abs_diff(values, 0.0);
    finite_or(safe_ratio(mean_diff, safe_mean(values, 0.0), 0.0) * 100.0, 0.0)
}

/// Perturbation quotient over an odd window (3 = RAP, 5 = PPQ5/APQ5).
///
/// Each interior value is compared against the mean of its window, which is
/// the textbook relative average perturbation. Legacy outputs that report
/// RAP as the local mean absolute difference ratio (the `jitter_percent`
/// value here) will not match `jitter_rap`.
/// Too few values, or an even or tiny window, yield `0.0`.
pub fn perturbation_quotient(values: &[f64], window: usize) -> f64 {
    if window < 3 || window % 2 == 0 || values.len() < window {
        return 0.0;
    }
    let center = window / 2;
    let deviations: Vec<f64> = values
        .windows(window)
        .filter_map(|w| {
            let local_mean = safe_mean(w, 0.0);
            checked_ratio((w[center] - local_mean).abs(), local_mean, DEFAULT_EPSILON)
        })
        .collect();
    finite_or(safe_mean(&deviations, 0.0) * 100.0, 0.0)
}

/// Jitter from the pitch contour, shimmer from amplitude at voiced frames.
///
/// Amplitude frames are matched to pitch frames by frame index; frames
/// without a positive amplitude are skipped. Shimmer values are capped at
/// the configured ceiling.
pub fn aggregate_perturbation(
    pitch: &CleanContour,
    amplitude: &CleanContour,
    config: &FeatureConfig,
) -> FeatureSet {
    let periods = periods(pitch);
    let amplitudes: Vec<f64> = amplitude
        .aligned_to(pitch)
        .into_iter()
        .filter(|&a| a > 0.0)
        .collect();
    let ceiling = config.shimmer_ceiling_percent;

    let mut features = FeatureSet::new();
    features.insert("jitter_percent", StatKind::Ratio, local_perturbation(&periods));
    features.insert("jitter_rap", StatKind::Ratio, perturbation_quotient(&periods, 3));
    features.insert("jitter_ppq5", StatKind::Ratio, perturbation_quotient(&periods, 5));
    features.insert(
        "shimmer_percent",
        StatKind::Ratio,
        local_perturbation(&amplitudes).min(ceiling),
    );
    features.insert(
        "shimmer_apq",
        StatKind::Ratio,
        perturbation_quotient(&amplitudes, 5).min(ceiling),
    );
    features.insert("period_count", StatKind::Count, periods.len() as f64);
    features.insert("amplitude_count", StatKind::Count, amplitudes.len() as f64);

    debug!(
        "Perturbation from {} periods and {} amplitudes",
        periods.len(),
        amplitudes.len()
    );

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour::{clean, RawContour};
    use proptest::prelude::*;

    fn contour(frames: Vec<Option<f64>>) -> CleanContour {
        clean(&RawContour::new(0.01, frames).unwrap(), None)
    }

    #[test]
    fn test_constant_pitch_has_no_jitter() {
        let pitch = contour(vec![Some(150.0); 100]);
        let amp = contour(vec![Some(0.3); 100]);
        let features = aggregate_perturbation(&pitch, &amp, &FeatureConfig::default());
        assert_eq!(features.value("jitter_percent"), Some(0.0));
        assert_eq!(features.value("jitter_rap"), Some(0.0));
        assert_eq!(features.value("jitter_ppq5"), Some(0.0));
        assert_eq!(features.value("shimmer_percent"), Some(0.0));
        assert_eq!(features.value("period_count"), Some(100.0));
    }

    #[test]
    fn test_single_period_is_zero() {
        let mut frames = vec![None; 99];
        frames.insert(40, Some(200.0));
        let pitch = contour(frames);
        let features = aggregate_perturbation(&pitch, &contour(vec![]), &FeatureConfig::default());
        assert_eq!(features.value("jitter_percent"), Some(0.0));
        assert_eq!(features.value("shimmer_percent"), Some(0.0));
        assert_eq!(features.value("period_count"), Some(1.0));
        assert_eq!(features.value("amplitude_count"), Some(0.0));
    }

    #[test]
    fn test_rap_uses_window_mean_not_consecutive_difference() {
        let values = [1.0, 2.0, 1.0, 2.0];
        // windows [1, 2, 1] and [2, 1, 2]: deviations 0.5 and 0.4 of the window mean
        assert!((perturbation_quotient(&values, 3) - 45.0).abs() < 1e-9);
        // consecutive differences of 1 over a mean of 1.5
        assert!((local_perturbation(&values) - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_near_zero_pitch_dropped_before_diffing() {
        let pitch = contour(vec![Some(100.0), Some(0.0), Some(100.0)]);
        assert_eq!(periods(&pitch), vec![0.01, 0.01]);

        // 1e-11 Hz would otherwise become a 1e11 s period
        let pitch = contour(vec![Some(100.0), Some(1e-11), Some(100.0)]);
        assert_eq!(periods(&pitch).len(), 2);
        let features = aggregate_perturbation(&pitch, &contour(vec![]), &FeatureConfig::default());
        assert_eq!(features.value("jitter_percent"), Some(0.0));
    }

    #[test]
    fn test_local_perturbation_value() {
        // periods alternate 0.01 / 0.011: mean diff 0.001, mean ~0.01033
        let values = [0.01, 0.011, 0.01, 0.011];
        let expected = 0.001 / 0.0105 * 100.0;
        assert!((local_perturbation(&values) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_quotient_needs_full_window() {
        assert_eq!(perturbation_quotient(&[1.0, 2.0], 3), 0.0);
        assert_eq!(perturbation_quotient(&[1.0, 2.0, 3.0, 4.0], 4), 0.0);
        // window [1, 2, 3]: |2 - 2| / 2 = 0
        assert_eq!(perturbation_quotient(&[1.0, 2.0, 3.0], 3), 0.0);
        // window [1, 4, 1]: |4 - 2| / 2 = 1 -> 100 %
        assert!((perturbation_quotient(&[1.0, 4.0, 1.0], 3) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shimmer_uses_voiced_frames_only() {
        let pitch = contour(vec![Some(100.0), None, Some(100.0), Some(100.0)]);
        // the unvoiced frame carries a wild amplitude that must be ignored
        let amp = contour(vec![Some(1.0), Some(50.0), Some(1.0), Some(1.0)]);
        let features = aggregate_perturbation(&pitch, &amp, &FeatureConfig::default());
        assert_eq!(features.value("amplitude_count"), Some(3.0));
        assert_eq!(features.value("shimmer_percent"), Some(0.0));
    }

    #[test]
    fn test_shimmer_is_capped() {
        let pitch = contour(vec![Some(100.0); 6]);
        let amp = contour(vec![Some(1.0), Some(10.0), Some(1.0), Some(10.0), Some(1.0), Some(10.0)]);
        let features = aggregate_perturbation(&pitch, &amp, &FeatureConfig::default());
        assert_eq!(features.value("shimmer_percent"), Some(50.0));
        assert!(features.value("shimmer_apq").unwrap() <= 50.0);
    }

    proptest! {
        #[test]
        fn prop_perturbation_finite(
            f0 in prop::collection::vec(prop::option::of(-10.0f64..1000.0), 0..120),
            amp in prop::collection::vec(prop::option::of(-1.0f64..100.0), 0..120),
        ) {
            let features = aggregate_perturbation(&contour(f0), &contour(amp), &FeatureConfig::default());
            prop_assert!(features.is_finite());
            prop_assert!(features.iter().all(|(_, v)| v.value.is_some()));
        }
    }
}
