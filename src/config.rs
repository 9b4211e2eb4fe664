use serde::Deserialize;
use std::path::Path;

use crate::error::AnalysisError;
use crate::report::format::Locale;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Parameters for one extraction. Passed explicitly to every analyzer call;
/// nothing here is process-global.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Ceiling on the analyzed region, in seconds of audio
    #[serde(default = "default_max_window_secs")]
    pub max_window_secs: f32,
    /// Samples per spectral frame (non-overlapping)
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// Frames with RMS at or below this are excluded from spectral statistics
    #[serde(default = "default_silence_threshold")]
    pub silence_threshold: f32,
    /// Fraction of spectral energy below the rolloff frequency
    #[serde(default = "default_rolloff_fraction")]
    pub rolloff_fraction: f32,
    #[serde(default = "default_min_bpm")]
    pub min_bpm: f32,
    #[serde(default = "default_max_bpm")]
    pub max_bpm: f32,
    /// Hop of the onset envelope used by the tempo estimator
    #[serde(default = "default_tempo_hop_size")]
    pub tempo_hop_size: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub locale: Locale,
    /// Classify a failed tempo estimate as if it were 0 BPM ("Slow/Ballad")
    /// instead of "Unknown".
    #[serde(default)]
    pub zero_tempo_category: bool,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_window_secs: default_max_window_secs(),
            frame_size: default_frame_size(),
            silence_threshold: default_silence_threshold(),
            rolloff_fraction: default_rolloff_fraction(),
            min_bpm: default_min_bpm(),
            max_bpm: default_max_bpm(),
            tempo_hop_size: default_tempo_hop_size(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            zero_tempo_category: false,
            title: default_title(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: String| Err(AnalysisError::InvalidConfig(msg));

        if !(self.max_window_secs.is_finite() && self.max_window_secs > 0.0) {
            return invalid(format!("max_window_secs must be positive, got {}", self.max_window_secs));
        }
        if self.frame_size < 4 {
            return invalid(format!("frame_size must be at least 4, got {}", self.frame_size));
        }
        if !(self.silence_threshold.is_finite() && self.silence_threshold >= 0.0) {
            return invalid(format!("silence_threshold must be >= 0, got {}", self.silence_threshold));
        }
        if !(self.rolloff_fraction > 0.0 && self.rolloff_fraction <= 1.0) {
            return invalid(format!("rolloff_fraction must be in (0, 1], got {}", self.rolloff_fraction));
        }
        if !(self.min_bpm > 0.0 && self.min_bpm < self.max_bpm) {
            return invalid(format!(
                "BPM range must satisfy 0 < min_bpm < max_bpm, got {}..{}",
                self.min_bpm, self.max_bpm
            ));
        }
        if self.tempo_hop_size == 0 {
            return invalid("tempo_hop_size must be non-zero".into());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn default_max_window_secs() -> f32 { 120.0 }
fn default_frame_size() -> usize { 4096 }
fn default_silence_threshold() -> f32 { 0.002 }
fn default_rolloff_fraction() -> f32 { 0.99 }
fn default_min_bpm() -> f32 { 90.0 }
fn default_max_bpm() -> f32 { 180.0 }
fn default_tempo_hop_size() -> usize { 512 }
fn default_title() -> String { "Extracted Technical Audio Data (spectral analysis + beat tracking):".into() }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match Config::from_toml_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::debug!("Config parse error in {}: {}", path.display(), err);
            None
        }
    }
}
