pub mod classify;
pub mod format;
pub mod parse;

use serde::Serialize;
use std::fmt;

use crate::audio::features::FeatureStats;
use crate::config::ReportConfig;
use classify::{Metric, UNKNOWN_TEMPO};
use format::{format_bpm, format_db, format_value};

/// One rendered metric block.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub metric: Metric,
    pub name: &'static str,
    /// Raw statistic the category was derived from
    pub value: f32,
    /// Value as printed on the `- Numeric:` line
    pub numeric: String,
    pub unit: String,
    pub category: &'static str,
}

/// Title plus the six metric blocks in fixed order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub metrics: Vec<FeatureSummary>,
}

impl Report {
    pub fn build(stats: &FeatureStats, config: &ReportConfig) -> Self {
        let locale = config.locale;

        let metrics = Metric::ALL
            .iter()
            .map(|&metric| {
                let (value, numeric, unit, category) = match metric {
                    Metric::Tempo => {
                        let bpm = stats.tempo_bpm.filter(|b| *b > 0.0 && b.is_finite());
                        let category = match bpm {
                            Some(b) => metric.classify(b),
                            None if config.zero_tempo_category => metric.classify(0.0),
                            None => UNKNOWN_TEMPO,
                        };
                        (bpm.unwrap_or(0.0), format_bpm(bpm, locale), "BPM".to_string(), category)
                    }
                    Metric::Energy => {
                        let v = stats.loudness;
                        let unit = format!("({} dB)", format_db(v, locale));
                        (v, format_value(v, locale), unit, metric.classify(v))
                    }
                    Metric::DynamicContrast => plain(metric, stats.dynamic_contrast, "", locale),
                    Metric::Brightness => plain(metric, stats.centroid_hz, "Hz", locale),
                    Metric::HighFreq => plain(metric, stats.rolloff_hz, "Hz", locale),
                    Metric::Texture => plain(metric, stats.zcr, "", locale),
                };

                FeatureSummary {
                    metric,
                    name: metric.name(),
                    value,
                    numeric,
                    unit,
                    category,
                }
            })
            .collect();

        Self {
            title: config.title.clone(),
            metrics,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<&FeatureSummary> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

fn plain(
    metric: Metric,
    value: f32,
    unit: &str,
    locale: format::Locale,
) -> (f32, String, String, &'static str) {
    (value, format_value(value, locale), unit.to_string(), metric.classify(value))
}

impl fmt::Display for FeatureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        if self.unit.is_empty() {
            writeln!(f, "- Numeric: {}", self.numeric)?;
        } else {
            writeln!(f, "- Numeric: {} {}", self.numeric, self.unit)?;
        }
        write!(f, "- Category: {}", self.category)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        for metric in &self.metrics {
            write!(f, "\n\n{}", metric)?;
        }
        Ok(())
    }
}
