use serde::{Deserialize, Serialize};

/// Number rendering convention for report values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// 1,234 and 0.123
    #[default]
    En,
    /// 1.234 and 0,123
    It,
}

impl Locale {
    fn separators(self) -> (char, char) {
        match self {
            Locale::En => (',', '.'),
            Locale::It => ('.', ','),
        }
    }
}

/// Hz-scale values (> 100) get no decimals and grouping, small ones three decimals.
pub fn format_value(value: f32, locale: Locale) -> String {
    if value > 100.0 {
        format_grouped(value, locale)
    } else {
        format_fixed(value, 3, locale)
    }
}

/// Whole BPM, or "N/A" when unknown.
pub fn format_bpm(bpm: Option<f32>, locale: Locale) -> String {
    match bpm {
        Some(b) if b > 0.0 && b.is_finite() => format_grouped(b, locale),
        _ => "N/A".to_string(),
    }
}

/// Linear amplitude as dBFS with one decimal.
pub fn format_db(amplitude: f32, locale: Locale) -> String {
    let db = 20.0 * amplitude.log10();
    if db.is_finite() {
        format_fixed(db, 1, locale)
    } else if db.is_nan() {
        "N/A".to_string()
    } else {
        "-inf".to_string()
    }
}

fn format_fixed(value: f32, decimals: usize, locale: Locale) -> String {
    let (_, decimal) = locale.separators();
    let s = format!("{:.*}", decimals, value);
    if decimal == '.' {
        s
    } else {
        s.replace('.', &decimal.to_string())
    }
}

fn format_grouped(value: f32, locale: Locale) -> String {
    let (group, _) = locale.separators();
    let s = format!("{:.0}", value);
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let mut out = String::with_capacity(s.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(group);
        }
        out.push(c);
    }
    out
}
