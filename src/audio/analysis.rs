use super::aggregate::aggregate;
use super::decode::AudioData;
use super::features::FeatureStats;
use super::spectral::SpectralAnalyzer;
use super::tempo::{OnsetTempoEstimator, TempoEstimator};
use super::window::select_window;
use crate::config::{AnalysisConfig, ReportConfig};
use crate::error::AnalysisError;
use crate::report::Report;

/// Window selection, tempo, frame analysis and aggregation for one buffer.
pub struct FeatureExtractor {
    config: AnalysisConfig,
    estimator: Box<dyn TempoEstimator>,
}

impl FeatureExtractor {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let estimator = OnsetTempoEstimator::from_config(&config);
        Self::with_estimator(config, estimator)
    }

    pub fn with_estimator(
        config: AnalysisConfig,
        estimator: impl TempoEstimator + 'static,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            config,
            estimator: Box::new(estimator),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, audio: &AudioData) -> FeatureStats {
        let window = select_window(audio.samples.len(), audio.sample_rate, self.config.max_window_secs);
        let samples = window.slice(&audio.samples);

        log::info!(
            "Analysis window: {:.1}s starting at {:.1}s",
            window.len as f32 / audio.sample_rate.max(1) as f32,
            window.start as f32 / audio.sample_rate.max(1) as f32
        );

        let analyzer = SpectralAnalyzer::new(&self.config, audio.sample_rate);

        let (tempo, series) = rayon::join(
            || self.estimate_tempo(samples, audio.sample_rate),
            || analyzer.analyze(samples),
        );

        let stats = aggregate(&series, analyzer.frame_size(), tempo);
        log::info!(
            "Features: tempo={}, loudness={:.4}, contrast={:.4}, centroid={:.0}Hz, rolloff={:.0}Hz, zcr={:.4}",
            tempo.map_or_else(|| "N/A".to_string(), |b| format!("{:.1}", b)),
            stats.loudness,
            stats.dynamic_contrast,
            stats.centroid_hz,
            stats.rolloff_hz,
            stats.zcr
        );
        stats
    }

    pub fn report(&self, audio: &AudioData, report_config: &ReportConfig) -> Report {
        Report::build(&self.analyze(audio), report_config)
    }

    /// Failures are logged and degrade to `None`.
    fn estimate_tempo(&self, samples: &[f32], sample_rate: u32) -> Option<f32> {
        match self.estimator.estimate(samples, sample_rate) {
            Ok(bpm) if bpm.is_finite() && bpm > 0.0 => Some(bpm),
            Ok(bpm) => {
                log::warn!("Tempo estimator returned unusable value {}, reporting N/A", bpm);
                None
            }
            Err(err) => {
                log::warn!("Beat detection failed, reporting N/A: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tempo::tests::pulse_track;
    use crate::error::TempoError;
    use crate::report::classify::{Metric, UNKNOWN_TEMPO};

    const SR: u32 = 44_100;

    struct FailingEstimator;

    impl TempoEstimator for FailingEstimator {
        fn estimate(&self, _: &[f32], _: u32) -> Result<f32, TempoError> {
            Err(TempoError::InsufficientSignal("forced".into()))
        }
    }

    struct FixedEstimator(f32);

    impl TempoEstimator for FixedEstimator {
        fn estimate(&self, _: &[f32], _: u32) -> Result<f32, TempoError> {
            Ok(self.0)
        }
    }

    fn audio(samples: Vec<f32>) -> AudioData {
        AudioData { samples, sample_rate: SR }
    }

    #[test]
    fn silence_yields_zeroed_stats_and_lowest_buckets() {
        let extractor = FeatureExtractor::new(AnalysisConfig::default()).unwrap();
        let silent = audio(vec![0.0; SR as usize * 10]);
        let stats = extractor.analyze(&silent);

        assert_eq!(stats.tempo_bpm, None);
        assert_eq!(stats.loudness, 0.0);
        assert_eq!(stats.dynamic_contrast, 0.0);
        assert_eq!(stats.centroid_hz, 0.0);
        assert_eq!(stats.rolloff_hz, 0.0);
        assert_eq!(stats.zcr, 0.0);
        assert_eq!(stats.frames, SR as usize * 10 / 4096);
        assert_eq!(stats.loud_frames, 0);

        let report = Report::build(&stats, &ReportConfig::default());
        assert_eq!(report.metrics.len(), 6);
        assert_eq!(report.get(Metric::Tempo).unwrap().numeric, "N/A");
        assert_eq!(report.get(Metric::Tempo).unwrap().category, UNKNOWN_TEMPO);
        assert_eq!(report.get(Metric::Energy).unwrap().category, "Low");
        assert_eq!(report.get(Metric::DynamicContrast).unwrap().category, "Compressed");
        assert_eq!(report.get(Metric::Brightness).unwrap().category, "Dark/Warm");
        assert_eq!(report.get(Metric::HighFreq).unwrap().category, "Muffled");
        assert_eq!(report.get(Metric::Texture).unwrap().category, "Smooth");
    }

    #[test]
    fn fast_loud_bright_track() {
        let extractor = FeatureExtractor::new(AnalysisConfig::default()).unwrap();
        let track = audio(pulse_track(170.0, 7000.0, 0.38, 0.25, 30.0, SR));
        let report = extractor.report(&track, &ReportConfig::default());

        assert_eq!(report.get(Metric::Tempo).unwrap().category, "Fast/Energetic");
        assert_eq!(report.get(Metric::Energy).unwrap().category, "High");
        assert_eq!(report.get(Metric::Brightness).unwrap().category, "Very Bright");
    }

    #[test]
    fn failing_estimator_still_produces_full_report() {
        let extractor = FeatureExtractor::with_estimator(AnalysisConfig::default(), FailingEstimator).unwrap();
        let track = audio(pulse_track(120.0, 1000.0, 0.2, 0.3, 10.0, SR));

        let report = extractor.report(&track, &ReportConfig::default());
        assert_eq!(report.metrics.len(), 6);
        assert_eq!(report.get(Metric::Tempo).unwrap().numeric, "N/A");
        assert_eq!(report.get(Metric::Tempo).unwrap().category, UNKNOWN_TEMPO);
        assert!(report.get(Metric::Energy).unwrap().value > 0.0);

        let legacy = ReportConfig { zero_tempo_category: true, ..Default::default() };
        let report = extractor.report(&track, &legacy);
        assert_eq!(report.get(Metric::Tempo).unwrap().category, "Slow/Ballad");
    }

    #[test]
    fn non_positive_tempo_is_treated_as_failure() {
        let extractor =
            FeatureExtractor::with_estimator(AnalysisConfig::default(), FixedEstimator(0.0)).unwrap();
        let stats = extractor.analyze(&audio(vec![0.1; 8192]));
        assert_eq!(stats.tempo_bpm, None);
    }

    #[test]
    fn long_input_is_bounded_by_window() {
        let config = AnalysisConfig { max_window_secs: 2.0, ..Default::default() };
        let extractor = FeatureExtractor::with_estimator(config, FixedEstimator(100.0)).unwrap();
        let long = audio(vec![0.25; SR as usize * 7]);
        let stats = extractor.analyze(&long);

        let ceiling = (2.0 * SR as f32 / 4096.0).ceil() as usize;
        assert!(stats.frames <= ceiling);
        assert_eq!(stats.frames, (2 * SR as usize) / 4096);
        assert_eq!(stats.tempo_bpm, Some(100.0));
    }

    #[test]
    fn identical_input_gives_identical_report() {
        let extractor = FeatureExtractor::new(AnalysisConfig::default()).unwrap();
        let track = audio(pulse_track(128.0, 2500.0, 0.1, 0.4, 8.0, SR));
        let first = extractor.report(&track, &ReportConfig::default()).to_string();
        let second = extractor.report(&track, &ReportConfig::default()).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn shorter_than_a_frame_is_still_a_report() {
        let extractor = FeatureExtractor::new(AnalysisConfig::default()).unwrap();
        let report = extractor.report(&audio(vec![0.5; 100]), &ReportConfig::default());
        assert_eq!(report.metrics.len(), 6);
        assert_eq!(report.get(Metric::Energy).unwrap().value, 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalysisConfig { frame_size: 0, ..Default::default() };
        assert!(matches!(FeatureExtractor::new(config), Err(AnalysisError::InvalidConfig(_))));
    }
}
