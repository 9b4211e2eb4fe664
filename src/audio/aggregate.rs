use super::features::{FeatureSeries, FeatureStats};

/// Reduce per-frame series to the scalar summary. Empty series yield 0.
pub fn aggregate(series: &FeatureSeries, frame_size: usize, tempo_bpm: Option<f32>) -> FeatureStats {
    let p95 = percentile(&series.rms, 0.95);
    let p5 = percentile(&series.rms, 0.05);

    let zcr_norm: Vec<f32> = series.zcr.iter().map(|&z| z / frame_size as f32).collect();

    FeatureStats {
        tempo_bpm,
        loudness: quadratic_mean(&series.rms),
        dynamic_contrast: p95 - p5,
        zcr: mean(&zcr_norm),
        centroid_hz: mean(&series.centroid_hz),
        rolloff_hz: mean(&series.rolloff_hz),
        frames: series.frame_count(),
        loud_frames: series.loud_frame_count(),
    }
}

pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// sqrt(mean(x^2)); weights loud frames more than the arithmetic mean.
pub fn quadratic_mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f32>() / values.len() as f32).sqrt()
}

/// Nearest-rank percentile: `sorted[floor(n * p)]`, clamped to the last index.
pub fn percentile(values: &[f32], p: f64) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let index = ((sorted.len() as f64 * p).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}
