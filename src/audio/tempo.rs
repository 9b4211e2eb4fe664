//! Tempo estimation.
//!
//! Tempo is the least reliable measurement in the pipeline, so estimators
//! report failure through [`TempoError`] and the caller degrades to "N/A"
//! instead of dropping the whole report.

use crate::config::AnalysisConfig;
use crate::error::TempoError;

/// Pluggable beat-tracking capability.
pub trait TempoEstimator: Send + Sync {
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> Result<f32, TempoError>;
}

/// Autocorrelation of an energy-onset envelope, searched only between
/// `min_bpm` and `max_bpm` so octave errors fold into that range.
#[derive(Clone, Debug)]
pub struct OnsetTempoEstimator {
    pub min_bpm: f32,
    pub max_bpm: f32,
    pub hop_size: usize,
}

impl OnsetTempoEstimator {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            min_bpm: config.min_bpm,
            max_bpm: config.max_bpm,
            hop_size: config.tempo_hop_size,
        }
    }
}

impl Default for OnsetTempoEstimator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl TempoEstimator for OnsetTempoEstimator {
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> Result<f32, TempoError> {
        if sample_rate == 0 || self.hop_size == 0 {
            return Err(TempoError::InsufficientSignal("invalid sample rate or hop size".into()));
        }

        let frame_rate = sample_rate as f32 / self.hop_size as f32;
        let min_lag = ((60.0 * frame_rate / self.max_bpm).floor() as usize).max(2);
        let max_lag = (60.0 * frame_rate / self.min_bpm).ceil() as usize;

        let novelty = onset_novelty(samples, self.hop_size);
        if novelty.len() < 2 * (max_lag + 1) {
            return Err(TempoError::InsufficientSignal(format!(
                "{} onset frames, need {}",
                novelty.len(),
                2 * (max_lag + 1)
            )));
        }

        let total: f32 = novelty.iter().sum();
        if total <= 1e-9 {
            return Err(TempoError::InsufficientSignal("no onsets detected".into()));
        }

        let mean = total / novelty.len() as f32;
        let centered: Vec<f32> = novelty.iter().map(|v| v - mean).collect();

        // lags min_lag-1 ..= max_lag+1 so the peak always has both neighbours
        let acf: Vec<f32> = (min_lag - 1..=max_lag + 1)
            .map(|lag| autocorrelation(&centered, lag))
            .collect();

        let (best, peak) = acf[1..acf.len() - 1]
            .iter()
            .enumerate()
            .map(|(i, &v)| (i + 1, v))
            .fold((0, f32::NEG_INFINITY), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });

        if !(peak > 0.0) {
            return Err(TempoError::NoPeriodicity {
                min_bpm: self.min_bpm,
                max_bpm: self.max_bpm,
            });
        }

        let lag = (min_lag - 1 + best) as f32 + parabolic_offset(acf[best - 1], peak, acf[best + 1]);
        let bpm = 60.0 * frame_rate / lag;

        log::debug!("Tempo: best lag {:.2} frames -> {:.1} BPM", lag, bpm);
        Ok(bpm)
    }
}

/// Half-wave rectified first difference of per-hop mean-square energy.
pub fn onset_novelty(samples: &[f32], hop_size: usize) -> Vec<f32> {
    let energy: Vec<f32> = samples
        .chunks_exact(hop_size)
        .map(|hop| hop.iter().map(|s| s * s).sum::<f32>() / hop_size as f32)
        .collect();

    energy.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect()
}

/// Mean lagged product over the overlapping region.
fn autocorrelation(signal: &[f32], lag: usize) -> f32 {
    if lag >= signal.len() {
        return 0.0;
    }
    let n = signal.len() - lag;
    signal[..n]
        .iter()
        .zip(&signal[lag..])
        .map(|(a, b)| a * b)
        .sum::<f32>()
        / n as f32
}

/// Vertex offset of the parabola through three equally spaced points.
fn parabolic_offset(left: f32, center: f32, right: f32) -> f32 {
    let denom = left - 2.0 * center + right;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Decaying tone bursts on every beat over a steady bed of the same tone.
    pub(crate) fn pulse_track(bpm: f64, freq: f64, bed: f64, accent: f64, secs: f64, sr: u32) -> Vec<f32> {
        let beat = 60.0 / bpm;
        let len = (secs * sr as f64) as usize;
        (0..len)
            .map(|i| {
                let t = i as f64 / sr as f64;
                let since_beat = t % beat;
                let amp = bed + accent * (-since_beat / 0.04).exp();
                (amp * (2.0 * std::f64::consts::PI * freq * t).sin()) as f32
            })
            .collect()
    }

    #[test]
    fn finds_120_bpm_clicks() {
        let samples = pulse_track(120.0, 1000.0, 0.0, 0.8, 20.0, 44_100);
        let bpm = OnsetTempoEstimator::default().estimate(&samples, 44_100).unwrap();
        assert!((bpm - 120.0).abs() < 4.0, "bpm {}", bpm);
    }

    #[test]
    fn finds_170_bpm_over_a_bed() {
        let samples = pulse_track(170.0, 7000.0, 0.3, 0.3, 30.0, 44_100);
        let bpm = OnsetTempoEstimator::default().estimate(&samples, 44_100).unwrap();
        assert!((bpm - 170.0).abs() < 6.0, "bpm {}", bpm);
    }

    #[test]
    fn slow_pulse_folds_into_range() {
        // 60 BPM has a strong second harmonic at 120
        let samples = pulse_track(60.0, 500.0, 0.0, 0.8, 30.0, 44_100);
        let est = OnsetTempoEstimator::default();
        if let Ok(bpm) = est.estimate(&samples, 44_100) {
            assert!(bpm >= est.min_bpm - 1.0 && bpm <= est.max_bpm + 1.0, "bpm {}", bpm);
        }
    }

    #[test]
    fn silence_fails() {
        let err = OnsetTempoEstimator::default()
            .estimate(&vec![0.0; 44_100 * 10], 44_100)
            .unwrap_err();
        assert!(matches!(err, TempoError::InsufficientSignal(_)));
    }

    #[test]
    fn too_short_fails() {
        let samples = pulse_track(120.0, 1000.0, 0.0, 0.8, 0.5, 44_100);
        let err = OnsetTempoEstimator::default().estimate(&samples, 44_100).unwrap_err();
        assert!(matches!(err, TempoError::InsufficientSignal(_)));
    }

    #[test]
    fn novelty_is_non_negative() {
        let samples = pulse_track(100.0, 800.0, 0.1, 0.5, 3.0, 22_050);
        let novelty = onset_novelty(&samples, 256);
        assert_eq!(novelty.len(), samples.len() / 256 - 1);
        assert!(novelty.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn parabola_vertex() {
        assert_eq!(parabolic_offset(1.0, 2.0, 1.0), 0.0);
        assert!(parabolic_offset(1.0, 2.0, 1.5) > 0.0);
        assert!(parabolic_offset(1.5, 2.0, 1.0) < 0.0);
    }
}
