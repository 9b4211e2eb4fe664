//! # trackscope
//!
//! Offline acoustic summary of an uploaded track, rendered as a short
//! structured text report that downstream prompt builders and report viewers
//! consume.
//!
//! ```text
//! decode -> centered window -> { tempo, frame-wise spectra } -> aggregate -> classify -> report
//! ```
//!
//! ```no_run
//! use std::path::Path;
//! use trackscope::{extract_audio_features, Config};
//!
//! let text = extract_audio_features(Path::new("demo.mp3"), &Config::default());
//! println!("{}", text);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod report;

use std::path::Path;

pub use audio::analysis::FeatureExtractor;
pub use audio::decode::AudioData;
pub use audio::features::FeatureStats;
pub use audio::tempo::{OnsetTempoEstimator, TempoEstimator};
pub use config::{AnalysisConfig, Config, ReportConfig};
pub use error::{AnalysisError, DecodeError, TempoError};
pub use report::parse::ParsedReport;
pub use report::Report;

/// Prefix of the advisory line returned when technical analysis fails.
pub const FAILURE_PREFIX: &str = "Errore analisi tecnica";

pub fn analyze_audio(audio: &AudioData, config: &Config) -> Result<Report, AnalysisError> {
    let extractor = FeatureExtractor::new(config.analysis.clone())?;
    Ok(extractor.report(audio, &config.report))
}

pub fn analyze_bytes(
    bytes: Vec<u8>,
    extension: Option<&str>,
    config: &Config,
) -> Result<Report, AnalysisError> {
    config.analysis.validate()?;
    let audio = audio::decode::decode_bytes(bytes, extension)?;
    analyze_audio(&audio, config)
}

pub fn analyze_file(path: &Path, config: &Config) -> Result<Report, AnalysisError> {
    config.analysis.validate()?;
    let audio = audio::decode::decode_file(path)?;
    analyze_audio(&audio, config)
}

/// Report text, or a single advisory line if the file could not be analyzed.
/// Never fails, so callers can always show something.
pub fn extract_audio_features(path: &Path, config: &Config) -> String {
    render_outcome(analyze_file(path, config))
}

pub fn extract_audio_features_from_bytes(
    bytes: Vec<u8>,
    extension: Option<&str>,
    config: &Config,
) -> String {
    render_outcome(analyze_bytes(bytes, extension, config))
}

pub fn failure_message(err: &AnalysisError) -> String {
    format!("{}: {}", FAILURE_PREFIX, err)
}

fn render_outcome(outcome: Result<Report, AnalysisError>) -> String {
    match outcome {
        Ok(report) => report.to_string(),
        Err(err) => {
            log::error!("Technical analysis failed: {}", err);
            failure_message(&err)
        }
    }
}
