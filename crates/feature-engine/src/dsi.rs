//! Dysphonia Severity Index
//!
//! `DSI = 0.13 MPT + 0.0053 F0-High - 0.26 I-Low - 1.18 Jitter(%) + 12.4`
//!
//! Roughly: +2 and above is a normal voice, 0 to +2 mild, -2 to 0
//! moderate and below -2 severe dysphonia.

use crate::features::{FeatureSet, StatKind};
use safe_stats::finite_or;
use tracing::debug;

/// Weight of maximum phonation time (s)
pub const MPT_WEIGHT: f64 = 0.13;
/// Weight of the highest reachable F0 (Hz)
pub const F0_HIGH_WEIGHT: f64 = 0.0053;
/// Weight of the lowest vocal intensity (dB)
pub const I_LOW_WEIGHT: f64 = -0.26;
/// Weight of local jitter (%)
pub const JITTER_WEIGHT: f64 = -1.18;
/// Constant term
pub const DSI_INTERCEPT: f64 = 12.4;

/// Weighted DSI score from its four inputs
pub fn dysphonia_severity_index(
    mpt_sec: f64,
    f0_high_hz: f64,
    i_low_db: f64,
    jitter_percent: f64,
) -> f64 {
    MPT_WEIGHT * mpt_sec
        + F0_HIGH_WEIGHT * f0_high_hz
        + I_LOW_WEIGHT * i_low_db
        + JITTER_WEIGHT * jitter_percent
        + DSI_INTERCEPT
}

/// `dsi_score` from already aggregated features.
///
/// MPT, F0-High and I-Low of exactly zero are fallbacks for missing signal,
/// not measurements, so any of them being zero or absent makes the score
/// null. Zero jitter is a real measurement; only an absent jitter does.
pub fn aggregate_dsi(features: &FeatureSet) -> FeatureSet {
    let measured = |name: &str| {
        features.value(name).filter(|v| v.is_finite() && *v != 0.0)
    };
    let jitter = features.value("jitter_percent").filter(|v| v.is_finite());

    let mut dsi = FeatureSet::new();
    match (measured("mpt_sec"), measured("f0_high_hz"), measured("i_low_db"), jitter) {
        (Some(mpt), Some(f0_high), Some(i_low), Some(jitter)) => {
            let score = dysphonia_severity_index(mpt, f0_high, i_low, jitter);
            debug!(
                "DSI {:.2} from MPT {:.2} s, F0-High {:.1} Hz, I-Low {:.1} dB, jitter {:.2} %",
                score, mpt, f0_high, i_low, jitter
            );
            dsi.insert("dsi_score", StatKind::Index, finite_or(score, 0.0));
        }
        _ => {
            debug!("DSI inputs incomplete, reporting null");
            dsi.insert_absent("dsi_score", StatKind::Index);
        }
    }
    dsi
}
