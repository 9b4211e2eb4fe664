//! Reading a rendered report back into tiles, the way the report viewer
//! and other downstream consumers do.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParsedMetric {
    pub name: String,
    pub value: String,
    pub unit: String,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParsedReport {
    pub title: String,
    pub metrics: Vec<ParsedMetric>,
}

impl ParsedReport {
    /// Lenient parse: missing lines fall back to "N/A" and an empty unit.
    pub fn parse(text: &str) -> Self {
        let blocks = split_blocks(text);
        let title = blocks.first().map(|b| b.join("\n")).unwrap_or_default();

        let metrics = blocks
            .iter()
            .skip(1)
            .map(|lines| {
                let name = lines[0].trim();
                let name = name.strip_suffix(':').unwrap_or(name).trim().to_string();

                let mut value = "N/A".to_string();
                let mut unit = String::new();
                let mut category = "N/A".to_string();

                if let Some(rest) = field(lines, "- Numeric:") {
                    let mut parts = rest.split_whitespace();
                    if let Some(v) = parts.next() {
                        value = v.to_string();
                        unit = parts.collect::<Vec<_>>().join(" ");
                    }
                }
                if let Some(rest) = field(lines, "- Category:") {
                    category = rest.trim().to_string();
                }

                ParsedMetric { name, value, unit, category }
            })
            .collect();

        Self { title, metrics }
    }
}

fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn field<'a>(lines: &[&'a str], prefix: &str) -> Option<&'a str> {
    lines
        .iter()
        .copied()
        .map(str::trim)
        .find_map(|l| l.strip_prefix(prefix))
}
