//! Pipeline configuration

use crate::PipelineError;
use config::{Config, Environment, File};
use feature_engine::FeatureConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides, e.g. `VOICE__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "VOICE";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Include the event target
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub logging: LoggingConfig,
    pub features: FeatureConfig,

    /// Pretty-print the result document
    pub pretty: bool,
}

impl PipelineConfig {
    /// Load defaults, then the optional file, then `VOICE__*` environment
    /// variables, each layer overriding the previous one.
    ///
    /// The file format follows its extension (toml, json, yaml, ...).
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.features.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(!config.pretty);
        assert!(config.features.validate().is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let path = write_temp(
            "pipeline.toml",
            r#"
pretty = true

[logging]
json = true

[features]
shimmer_ceiling_percent = 40.0
placeholder = "null"
"#,
        );
        let config = PipelineConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.pretty);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.features.shimmer_ceiling_percent, 40.0);
        assert_eq!(config.features.placeholder, feature_engine::Placeholder::Null);
        assert_eq!(config.features.hnr_fallback_db, 10.0);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let path = write_temp(
            "invalid.json",
            r#"{ "features": { "speech_percentile": 250.0 } }"#,
        );
        let result = PipelineConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PipelineError::Feature(_))));
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = std::env::temp_dir().join("voice-pipeline-does-not-exist.toml");
        assert!(matches!(
            PipelineConfig::load(Some(&path)),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("VOICE__FEATURES__I_LOW_PERCENTILE", "7.5");
        let config = PipelineConfig::load(None);
        std::env::remove_var("VOICE__FEATURES__I_LOW_PERCENTILE");
        assert_eq!(config.unwrap().features.i_low_percentile, 7.5);
    }
}
