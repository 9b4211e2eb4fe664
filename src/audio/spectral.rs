use rayon::prelude::*;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::features::{FeatureSeries, FrameFeatures};
use crate::config::AnalysisConfig;

/// Non-overlapping Hann-windowed frame analysis.
pub struct SpectralAnalyzer {
    frame_size: usize,
    sample_rate: u32,
    silence_threshold: f32,
    rolloff_fraction: f32,
    fft: Arc<dyn Fft<f32>>,
    hann: Vec<f32>,
}

impl SpectralAnalyzer {
    pub fn new(config: &AnalysisConfig, sample_rate: u32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.frame_size);

        Self {
            frame_size: config.frame_size,
            sample_rate,
            silence_threshold: config.silence_threshold,
            rolloff_fraction: config.rolloff_fraction,
            fft,
            hann: hann_window(config.frame_size),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Analyze every complete frame of `samples` and gate spectral
    /// descriptors on loudness. A trailing partial frame is dropped.
    pub fn analyze(&self, samples: &[f32]) -> FeatureSeries {
        let frames: Vec<FrameFeatures> = samples
            .par_chunks_exact(self.frame_size)
            .map(|frame| self.frame_features(frame))
            .collect();

        let bin_hz = self.sample_rate as f32 / self.frame_size as f32;
        let mut series = FeatureSeries {
            rms: Vec::with_capacity(frames.len()),
            ..Default::default()
        };

        for f in &frames {
            series.rms.push(f.rms);
            if f.rms > self.silence_threshold {
                series.zcr.push(f.zcr as f32);
                series.centroid_hz.push(f.centroid_bin * bin_hz);
                series.rolloff_hz.push(f.rolloff_hz);
            }
        }

        log::debug!(
            "Spectral analysis: {} frames, {} above silence threshold {}",
            series.frame_count(),
            series.loud_frame_count(),
            self.silence_threshold
        );

        series
    }

    pub fn frame_features(&self, frame: &[f32]) -> FrameFeatures {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(self.hann.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let spectrum: Vec<f32> = buffer[..self.frame_size / 2].iter().map(|c| c.norm()).collect();

        FrameFeatures {
            rms: rms(frame),
            zcr: zero_crossings(frame),
            centroid_bin: centroid_bin(&spectrum),
            rolloff_hz: rolloff_hz(&spectrum, self.sample_rate, self.rolloff_fraction),
        }
    }
}

pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

/// Zero counts as positive.
pub fn zero_crossings(frame: &[f32]) -> u32 {
    frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count() as u32
}

pub fn centroid_bin(spectrum: &[f32]) -> f32 {
    let total: f32 = spectrum.iter().sum();
    if total <= 1e-10 {
        return 0.0;
    }
    spectrum
        .iter()
        .enumerate()
        .map(|(i, &mag)| i as f32 * mag)
        .sum::<f32>()
        / total
}

/// Walks down from Nyquist removing bins until the remaining amplitude sum
/// no longer exceeds `fraction` of the total.
pub fn rolloff_hz(spectrum: &[f32], sample_rate: u32, fraction: f32) -> f32 {
    if spectrum.len() < 2 {
        return 0.0;
    }
    let nyquist = sample_rate as f32 / 2.0;
    let bin_hz = nyquist / (spectrum.len() - 1) as f32;

    let mut energy: f32 = spectrum.iter().sum();
    let threshold = fraction * energy;
    let mut n = spectrum.len();
    while energy > threshold && n > 0 {
        n -= 1;
        energy -= spectrum[n];
    }
    n as f32 * bin_hz
}

pub fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44_100;

    fn sine(freq: f32, amp: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amp * (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
            .collect()
    }

    fn analyzer() -> SpectralAnalyzer {
        SpectralAnalyzer::new(&AnalysisConfig::default(), SR)
    }

    #[test]
    fn rms_of_constant_and_sine() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-6);
        let s = sine(441.0, 1.0, 4000);
        assert!((rms(&s) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn zero_crossings_counts_sign_changes() {
        assert_eq!(zero_crossings(&[1.0, -1.0, 1.0, -1.0]), 3);
        assert_eq!(zero_crossings(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(zero_crossings(&[-0.1, 0.0, 0.2, -0.3]), 2);
        assert_eq!(zero_crossings(&[]), 0);
    }

    #[test]
    fn hann_is_zero_at_edges_and_one_in_middle() {
        let w = hann_window(5);
        assert!(w[0].abs() < 1e-6);
        assert!(w[4].abs() < 1e-6);
        assert!((w[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn centroid_of_flat_and_silent_spectra() {
        assert_eq!(centroid_bin(&[0.0; 8]), 0.0);
        assert!((centroid_bin(&[1.0; 5]) - 2.0).abs() < 1e-6);
        assert!((centroid_bin(&[0.0, 0.0, 0.0, 4.0]) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn rolloff_of_single_peak() {
        // all energy in bin 2 of 5 (bin width = (sr/2)/4)
        let spectrum = [0.0, 0.0, 1.0, 0.0, 0.0];
        let hz = rolloff_hz(&spectrum, 8000, 0.99);
        assert!((hz - 2000.0).abs() < 1e-3, "got {}", hz);
        assert_eq!(rolloff_hz(&[0.0; 5], 8000, 0.99), 5.0 * 1000.0);
    }

    #[test]
    fn sine_centroid_lands_on_its_frequency() {
        let a = analyzer();
        let f = a.frame_features(&sine(7000.0, 0.5, 4096));
        let centroid_hz = f.centroid_bin * SR as f32 / 4096.0;
        assert!((centroid_hz - 7000.0).abs() < 150.0, "centroid {}", centroid_hz);
        assert!(f.rolloff_hz > 6000.0 && f.rolloff_hz < 12_000.0, "rolloff {}", f.rolloff_hz);
        // ~2 crossings per cycle
        let expected = 2.0 * 7000.0 * 4096.0 / SR as f32;
        assert!((f.zcr as f32 - expected).abs() < 5.0);
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        let a = analyzer();
        let series = a.analyze(&sine(1000.0, 0.5, 4096 * 3 + 100));
        assert_eq!(series.frame_count(), 3);
        assert_eq!(series.loud_frame_count(), 3);
    }

    #[test]
    fn quiet_frames_are_gated_out_of_spectral_series() {
        let a = analyzer();
        let mut samples = sine(3000.0, 0.5, 4096 * 2);
        samples.extend(vec![0.0; 4096]);
        samples.extend(sine(3000.0, 0.001, 4096));

        let series = a.analyze(&samples);
        assert_eq!(series.rms.len(), 4);
        assert_eq!(series.zcr.len(), 2);
        assert_eq!(series.centroid_hz.len(), 2);
        assert_eq!(series.rolloff_hz.len(), 2);
        assert_eq!(series.rms[2], 0.0);
        assert!(series.rms[3] > 0.0 && series.rms[3] < 0.002);
    }

    #[test]
    fn shorter_than_one_frame_gives_nothing() {
        let series = analyzer().analyze(&[0.3; 1000]);
        assert_eq!(series, FeatureSeries::default());
    }
}
