use serde::Serialize;

/// Descriptors for one fixed-size frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameFeatures {
    /// RMS of the un-windowed frame (linear)
    pub rms: f32,
    /// Sign changes within the frame (unnormalized count)
    pub zcr: u32,
    /// Amplitude-weighted mean bin index
    pub centroid_bin: f32,
    /// Frequency below which the configured energy fraction lies (Hz)
    pub rolloff_hz: f32,
}

/// Per-frame measurements collected across the analysis window.
///
/// `rms` covers every frame; the other three only frames that passed the
/// silence gate, so they have equal length and may be shorter than `rms`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSeries {
    pub rms: Vec<f32>,
    pub zcr: Vec<f32>,
    pub centroid_hz: Vec<f32>,
    pub rolloff_hz: Vec<f32>,
}

impl FeatureSeries {
    pub fn frame_count(&self) -> usize {
        self.rms.len()
    }

    pub fn loud_frame_count(&self) -> usize {
        self.zcr.len()
    }
}

/// Scalar summary of a track.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeatureStats {
    /// `None` when tempo estimation failed
    pub tempo_bpm: Option<f32>,
    /// Quadratic mean of per-frame RMS
    pub loudness: f32,
    /// p95 - p5 of per-frame RMS
    pub dynamic_contrast: f32,
    /// Mean zero-crossing rate normalized by frame size
    pub zcr: f32,
    pub centroid_hz: f32,
    pub rolloff_hz: f32,
    pub frames: usize,
    pub loud_frames: usize,
}
