use thiserror::Error;

/// Failure to turn uploaded bytes into samples.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported or corrupt audio: {0}")]
    Format(#[from] symphonia::core::errors::Error),

    #[error("No audio tracks found")]
    NoTrack,

    #[error("Unknown sample rate")]
    UnknownSampleRate,

    #[error("Empty input")]
    Empty,
}

/// Tempo estimation failure. Never fatal for a report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TempoError {
    #[error("not enough signal to estimate tempo ({0})")]
    InsufficientSignal(String),

    #[error("no periodicity found between {min_bpm} and {max_bpm} BPM")]
    NoPeriodicity { min_bpm: f32, max_bpm: f32 },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
