use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use trackscope::report::format::Locale;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "trackscope", about = "Technical audio feature report for critic prompts")]
pub struct Cli {
    /// Input audio files (WAV, MP3, FLAC, OGG, AAC)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (defaults to ./trackscope.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Maximum seconds of audio to analyze, centered in the track
    #[arg(long)]
    pub window_secs: Option<f32>,

    /// Samples per spectral frame
    #[arg(long)]
    pub frame_size: Option<usize>,

    /// Number formatting for the report
    #[arg(long, value_enum)]
    pub locale: Option<Locale>,

    /// Exit with an error instead of printing the advisory line when a file cannot be analyzed
    #[arg(long)]
    pub strict: bool,
}
