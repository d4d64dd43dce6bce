//! Voice Biomarker Pipeline - Main Entry Point
//!
//! Usage: `voice-pipeline <contours.json> [config.toml]`

use std::path::PathBuf;
use tracing::info;
use voice_pipeline::{analyze_file, init_logging, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        eprintln!("usage: voice-pipeline <contours.json> [config.toml]");
        std::process::exit(2);
    };
    let config_path = args.next().map(PathBuf::from);

    let config = PipelineConfig::load(config_path.as_deref())?;
    init_logging(&config.logging)?;

    info!("=== Voice Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Analyzing {}", input.display());

    let output = analyze_file(&input, &config)?;
    println!("{}", output);

    Ok(())
}
