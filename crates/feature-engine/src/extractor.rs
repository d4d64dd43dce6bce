//! Voice Feature Extractor
//!
//! Cleans every contour of a recording, runs the aggregators and passes the
//! merged feature set through the output sanitizer.

use crate::articulation::aggregate_articulation;
use crate::config::FeatureConfig;
use crate::dsi::aggregate_dsi;
use crate::energy::aggregate_energy;
use crate::error::FeatureError;
use crate::features::FeatureSet;
use crate::perturbation::aggregate_perturbation;
use crate::phonation::aggregate_phonation;
use crate::pitch::aggregate_pitch;
use crate::segments::average_segments;
use crate::sanitizer::sanitize_features;
use crate::spectral::{aggregate_spectral, SpectralInput};
use contour::{clean, CleanContour, PlausibleRange, RawContour};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Raw per-frame spectral measurements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralContours {
    pub centroid: Option<RawContour>,
    pub rolloff: Option<RawContour>,
    pub hnr_db: Option<RawContour>,
    pub high_band_magnitude: Option<RawContour>,
    pub total_magnitude: Option<RawContour>,
    pub f1: Option<RawContour>,
    pub f2: Option<RawContour>,
}

/// All contours measured for one recording.
///
/// Only pitch is required; a missing contour behaves like one in which
/// every frame was undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingContours {
    /// Fundamental frequency (Hz)
    pub pitch: RawContour,
    /// Intensity (Pa), also the amplitude source for shimmer
    #[serde(default)]
    pub intensity: Option<RawContour>,
    /// Frame RMS (linear)
    #[serde(default)]
    pub rms: Option<RawContour>,
    #[serde(default)]
    pub spectral: SpectralContours,
}

impl RecordingContours {
    /// Recording with only a pitch contour
    pub fn from_pitch(pitch: RawContour) -> Self {
        Self {
            pitch,
            intensity: None,
            rms: None,
            spectral: SpectralContours::default(),
        }
    }
}

/// How many frames of a contour survived cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourCoverage {
    pub kept: usize,
    pub removed: usize,
    pub original: usize,
}

impl From<&CleanContour> for ContourCoverage {
    fn from(contour: &CleanContour) -> Self {
        Self {
            kept: contour.len(),
            removed: contour.removed_count(),
            original: contour.original_count(),
        }
    }
}

/// Sanitized features together with per-contour coverage
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub features: FeatureSet,
    pub coverage: BTreeMap<String, ContourCoverage>,
    /// Features the output sanitizer had to replace
    pub replaced: Vec<String>,
}

/// Feature extractor for recorded voice contours.
///
/// Holds only immutable configuration; one instance can serve concurrent
/// callers by shared reference.
#[derive(Debug, Clone)]
pub struct VoiceFeatureExtractor {
    config: FeatureConfig,
}

impl VoiceFeatureExtractor {
    /// Create an extractor, validating the configuration once
    pub fn new(config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract the sanitized feature set of one recording
    pub fn extract(&self, contours: &RecordingContours) -> Result<FeatureSet, FeatureError> {
        self.extract_report(contours).map(|report| report.features)
    }

    /// Extract every segment of a recording and average the results.
    ///
    /// Zero-valued segment features are left out of each average and the
    /// DSI is recomputed from the averaged inputs. No segments yield an
    /// empty set.
    pub fn extract_segments(
        &self,
        segments: &[RecordingContours],
    ) -> Result<FeatureSet, FeatureError> {
        let features = segments
            .iter()
            .map(|segment| self.extract(segment))
            .collect::<Result<Vec<_>, _>>()?;
        if features.is_empty() {
            return Ok(FeatureSet::new());
        }

        let mut averaged = average_segments(&features);
        let dsi = aggregate_dsi(&averaged);
        averaged.extend(dsi);

        info!("Averaged {} segments into {} features", features.len(), averaged.len());
        Ok(sanitize_features(averaged, self.config.placeholder).value)
    }

    /// Extract features plus coverage and sanitizer report
    pub fn extract_report(&self, contours: &RecordingContours) -> Result<Extraction, FeatureError> {
        let cleaning = &self.config.cleaning;
        let hop = contours.pitch.hop_seconds();

        let pitch = clean(&contours.pitch, cleaning.pitch_range);
        let intensity =
            clean_aligned("intensity", contours.intensity.as_ref(), cleaning.intensity_range, hop)?;
        let rms = clean_aligned("rms", contours.rms.as_ref(), cleaning.rms_range, hop)?;

        let raw = &contours.spectral;
        let spectral = SpectralInput {
            centroid: clean_aligned("centroid", raw.centroid.as_ref(), cleaning.spectral_range, hop)?,
            rolloff: clean_aligned("rolloff", raw.rolloff.as_ref(), cleaning.spectral_range, hop)?,
            hnr_db: clean_aligned("hnr_db", raw.hnr_db.as_ref(), cleaning.hnr_range, hop)?,
            high_band_magnitude: clean_aligned(
                "high_band_magnitude",
                raw.high_band_magnitude.as_ref(),
                cleaning.spectral_range,
                hop,
            )?,
            total_magnitude: clean_aligned(
                "total_magnitude",
                raw.total_magnitude.as_ref(),
                cleaning.spectral_range,
                hop,
            )?,
            f1: clean_aligned("f1", raw.f1.as_ref(), cleaning.formant_range, hop)?,
            f2: clean_aligned("f2", raw.f2.as_ref(), cleaning.formant_range, hop)?,
        };

        let mut features = FeatureSet::new();
        features.extend(aggregate_pitch(&pitch, &self.config)?);
        features.extend(aggregate_perturbation(&pitch, &intensity, &self.config));
        features.extend(aggregate_energy(&rms, &self.config));
        features.extend(aggregate_articulation(&rms, &self.config)?);
        features.extend(aggregate_phonation(&intensity, &self.config)?);
        features.extend(aggregate_spectral(&spectral, &self.config));
        let dsi = aggregate_dsi(&features);
        features.extend(dsi);

        let coverage: BTreeMap<String, ContourCoverage> = [
            ("pitch", &pitch),
            ("intensity", &intensity),
            ("rms", &rms),
            ("hnr", &spectral.hnr_db),
            ("formants", &spectral.f1),
        ]
        .into_iter()
        .map(|(name, contour)| (name.to_string(), ContourCoverage::from(contour)))
        .collect();

        let sanitized = sanitize_features(features, self.config.placeholder);
        if !sanitized.is_clean() {
            warn!(
                "Output sanitizer replaced {} feature(s): {:?}",
                sanitized.replaced.len(),
                sanitized.replaced
            );
        }

        info!(
            "Extracted {} features from {} pitch frames ({} voiced)",
            sanitized.value.len(),
            pitch.original_count(),
            pitch.len()
        );

        Ok(Extraction {
            features: sanitized.value,
            coverage,
            replaced: sanitized.replaced,
        })
    }
}

/// Relative tolerance when comparing frame hops
const HOP_TOLERANCE: f64 = 1e-9;

/// Clean a contour that must share the pitch frame grid.
///
/// Frames are matched across contours by index, so a supplied contour with
/// a different hop is rejected. A missing contour becomes an empty one.
fn clean_aligned(
    name: &'static str,
    raw: Option<&RawContour>,
    range: Option<PlausibleRange>,
    pitch_hop: f64,
) -> Result<CleanContour, FeatureError> {
    match raw {
        Some(raw) => {
            let hop = raw.hop_seconds();
            if (hop - pitch_hop).abs() > HOP_TOLERANCE * pitch_hop {
                return Err(FeatureError::InvalidArgument {
                    name,
                    reason: format!("hop {} s differs from pitch hop {} s", hop, pitch_hop),
                });
            }
            Ok(clean(raw, range))
        }
        None => {
            debug!("Contour {} not supplied, using an empty one", name);
            Ok(clean(&RawContour::empty(pitch_hop)?, range))
        }
    }
}
