//! Voice Feature Engine
//!
//! Turns cleaned acoustic contours into recording-level voice biomarkers:
//! pitch, perturbation, energy, articulation, phonation and spectral
//! summaries, plus the Dysphonia Severity Index. Every value leaving this
//! crate is finite or an explicit null.

mod articulation;
mod config;
mod dsi;
mod energy;
mod error;
mod extractor;
mod features;
mod perturbation;
mod phonation;
mod pitch;
mod sanitizer;
mod segments;
mod spectral;

pub use articulation::aggregate_articulation;
pub use config::FeatureConfig;
pub use dsi::{aggregate_dsi, dysphonia_severity_index};
pub use energy::{aggregate_energy, to_decibels};
pub use error::FeatureError;
pub use extractor::{
    ContourCoverage, Extraction, RecordingContours, SpectralContours, VoiceFeatureExtractor,
};
pub use features::{FeatureSet, FeatureValue, StatKind};
pub use perturbation::{aggregate_perturbation, local_perturbation, perturbation_quotient, periods};
pub use phonation::aggregate_phonation;
pub use pitch::aggregate_pitch;
pub use sanitizer::{sanitize, sanitize_features, Node, Placeholder, Sanitized};
pub use segments::average_segments;
pub use spectral::{aggregate_spectral, SpectralInput};
