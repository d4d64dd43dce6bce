//! Voice Biomarker Pipeline
//!
//! Loads configuration, installs logging and turns recorded contours into
//! a sanitized JSON result document.

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{LoggingConfig, PipelineConfig};
pub use logging::init_logging;
pub use pipeline::{VoicePipeline, RECORDINGS_TOTAL, SANITIZED_VALUES_TOTAL};

use feature_engine::FeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Feature(#[from] FeatureError),
}

/// Read a recording file and analyze it with `config`
pub fn analyze_file(
    path: &std::path::Path,
    config: &PipelineConfig,
) -> Result<String, PipelineError> {
    let input = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    VoicePipeline::new(config)?.analyze_json(&input)
}
