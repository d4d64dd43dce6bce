//! Recording analysis and result documents

use crate::config::PipelineConfig;
use crate::PipelineError;
use feature_engine::{
    sanitize, ContourCoverage, Node, Placeholder, RecordingContours, VoiceFeatureExtractor,
};
use tracing::{info, warn};

/// Counter of analyzed recordings
pub const RECORDINGS_TOTAL: &str = "voice_pipeline_recordings_total";
/// Counter of non-finite values replaced at the output gate
pub const SANITIZED_VALUES_TOTAL: &str = "voice_pipeline_sanitized_values_total";

/// Runs recordings through feature extraction and renders result documents
#[derive(Debug, Clone)]
pub struct VoicePipeline {
    extractor: VoiceFeatureExtractor,
    placeholder: Placeholder,
    pretty: bool,
}

impl VoicePipeline {
    /// Create a pipeline from validated configuration
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            extractor: VoiceFeatureExtractor::new(config.features.clone())?,
            placeholder: config.features.placeholder,
            pretty: config.pretty,
        })
    }

    /// Analyze one recording into a sanitized result document.
    ///
    /// `{ "version", "features": { name: number|null }, "coverage": { contour: { kept, removed, original } } }`
    pub fn analyze(&self, contours: &RecordingContours) -> Result<Node, PipelineError> {
        let extraction = self.extractor.extract_report(contours)?;
        metrics::counter!(RECORDINGS_TOTAL).increment(1);

        let coverage = Node::map(
            extraction
                .coverage
                .iter()
                .map(|(name, c)| (name.clone(), coverage_node(c))),
        );
        let document = Node::map([
            ("version", Node::from(env!("CARGO_PKG_VERSION"))),
            ("features", Node::from(extraction.features)),
            ("coverage", coverage),
        ]);

        // second gate for anything assembled after feature extraction
        let sanitized = sanitize(document, self.placeholder);
        let replaced = extraction.replaced.len() + sanitized.replaced.len();
        if replaced > 0 {
            warn!("Result document needed {} replacement(s)", replaced);
            metrics::counter!(SANITIZED_VALUES_TOTAL).increment(replaced as u64);
        }

        info!(
            "Analyzed recording: {} pitch frames",
            contours.pitch.frame_count()
        );
        Ok(sanitized.value)
    }

    /// Parse a JSON recording and render its result document as JSON
    pub fn analyze_json(&self, input: &str) -> Result<String, PipelineError> {
        let contours: RecordingContours = serde_json::from_str(input)?;
        let document = self.analyze(&contours)?;
        let json = if self.pretty {
            document.to_json_pretty()?
        } else {
            document.to_json()?
        };
        Ok(json)
    }
}

fn coverage_node(coverage: &ContourCoverage) -> Node {
    Node::map([
        ("kept", Node::from(coverage.kept)),
        ("removed", Node::from(coverage.removed)),
        ("original", Node::from(coverage.original)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour::RawContour;
    use proptest::prelude::*;

    fn pipeline() -> VoicePipeline {
        VoicePipeline::new(&PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let contours = RecordingContours::from_pitch(
            RawContour::new(0.01, vec![Some(150.0), None, Some(150.0), Some(150.0)]).unwrap(),
        );
        let document = pipeline().analyze(&contours).unwrap();

        assert_eq!(
            document.get("version"),
            Some(&Node::from(env!("CARGO_PKG_VERSION")))
        );
        let features = document.get("features").unwrap();
        assert_eq!(features.get("f0_mean_hz").and_then(Node::as_f64), Some(150.0));
        assert_eq!(features.get("voiced_fraction").and_then(Node::as_f64), Some(0.75));

        let pitch = document.get("coverage").and_then(|c| c.get("pitch")).unwrap();
        assert_eq!(pitch.get("kept").and_then(Node::as_f64), Some(3.0));
        assert_eq!(pitch.get("removed").and_then(Node::as_f64), Some(1.0));
        assert_eq!(pitch.get("original").and_then(Node::as_f64), Some(4.0));
        assert!(document.is_finite());
    }

    #[test]
    fn test_analyze_json_silence() {
        let input = r#"{ "pitch": { "hop_seconds": 0.01, "frames": [null, null, null] } }"#;
        let output = pipeline().analyze_json(input).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["features"]["f0_mean_hz"], 0.0);
        assert_eq!(parsed["features"]["voiced_fraction"], 0.0);
        assert!(parsed["features"]["f1_mean_hz"].is_null());
        assert_eq!(parsed["coverage"]["pitch"]["kept"], 0.0);
    }

    #[test]
    fn test_analyze_json_rejects_bad_hop() {
        let input = r#"{ "pitch": { "hop_seconds": -1.0, "frames": [] } }"#;
        assert!(matches!(
            pipeline().analyze_json(input),
            Err(PipelineError::Json(_))
        ));
    }

    #[test]
    fn test_pretty_output() {
        let config = PipelineConfig {
            pretty: true,
            ..Default::default()
        };
        let input = r#"{ "pitch": { "hop_seconds": 0.01, "frames": [120.0] } }"#;
        let output = VoicePipeline::new(&config).unwrap().analyze_json(input).unwrap();
        assert!(output.contains('\n'));
    }

    proptest! {
        #[test]
        fn prop_output_is_valid_json(
            frames in prop::collection::vec(prop::option::of(-10.0f64..1000.0), 0..64),
        ) {
            let contours = RecordingContours::from_pitch(RawContour::new(0.01, frames).unwrap());
            let document = pipeline().analyze(&contours).unwrap();
            prop_assert!(document.is_finite());
            let json = document.to_json().unwrap();
            prop_assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
        }
    }
}
