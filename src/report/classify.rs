use serde::Serialize;

/// Label used when the tempo could not be estimated.
pub const UNKNOWN_TEMPO: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rule {
    pub threshold: f32,
    pub label: &'static str,
}

const fn rule(threshold: f32, label: &'static str) -> Rule {
    Rule { threshold, label }
}

const TEMPO_RULES: &[Rule] = &[
    rule(85.0, "Slow/Ballad"),
    rule(115.0, "Mid-Tempo"),
    rule(140.0, "Up-Tempo"),
];
const ENERGY_RULES: &[Rule] = &[
    rule(0.1, "Low"),
    rule(0.25, "Moderate"),
    rule(0.4, "High"),
];
const CONTRAST_RULES: &[Rule] = &[rule(0.05, "Compressed"), rule(0.15, "Balanced")];
const BRIGHTNESS_RULES: &[Rule] = &[
    rule(2000.0, "Dark/Warm"),
    rule(4000.0, "Neutral"),
    rule(6000.0, "Bright"),
];
const ROLLOFF_RULES: &[Rule] = &[
    rule(8000.0, "Muffled"),
    rule(14000.0, "Standard"),
    rule(18000.0, "Hi-Fi"),
];
const TEXTURE_RULES: &[Rule] = &[rule(0.03, "Smooth"), rule(0.08, "Textured")];

/// The six summary metrics, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Tempo,
    Energy,
    DynamicContrast,
    Brightness,
    HighFreq,
    Texture,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Tempo,
        Metric::Energy,
        Metric::DynamicContrast,
        Metric::Brightness,
        Metric::HighFreq,
        Metric::Texture,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Tempo => "Tempo",
            Metric::Energy => "Energy Level (RMS)",
            Metric::DynamicContrast => "Dynamic Contrast",
            Metric::Brightness => "Brightness (Centroid)",
            Metric::HighFreq => "High-Freq Content (Rolloff)",
            Metric::Texture => "Texture (Roughness/ZCR)",
        }
    }

    pub fn rules(self) -> &'static [Rule] {
        match self {
            Metric::Tempo => TEMPO_RULES,
            Metric::Energy => ENERGY_RULES,
            Metric::DynamicContrast => CONTRAST_RULES,
            Metric::Brightness => BRIGHTNESS_RULES,
            Metric::HighFreq => ROLLOFF_RULES,
            Metric::Texture => TEXTURE_RULES,
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Metric::Tempo => "Fast/Energetic",
            Metric::Energy => "Very High",
            Metric::DynamicContrast => "High Range",
            Metric::Brightness => "Very Bright",
            Metric::HighFreq => "Airy/Crisp",
            Metric::Texture => "Noisy/Distorted",
        }
    }

    pub fn classify(self, value: f32) -> &'static str {
        classify(value, self.rules(), self.default_label())
    }

    /// Every label this metric can produce.
    pub fn labels(self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = self.rules().iter().map(|r| r.label).collect();
        labels.push(self.default_label());
        if self == Metric::Tempo {
            labels.push(UNKNOWN_TEMPO);
        }
        labels
    }
}

/// Label of the first rule whose threshold is strictly above `value`.
pub fn classify(value: f32, rules: &[Rule], default: &'static str) -> &'static str {
    rules
        .iter()
        .find(|r| value < r.threshold)
        .map_or(default, |r| r.label)
}
