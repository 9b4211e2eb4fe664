/// Contiguous region of a sample buffer selected for analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: usize,
    pub len: usize,
}

impl AnalysisWindow {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slice<'a>(&self, samples: &'a [f32]) -> &'a [f32] {
        let start = self.start.min(samples.len());
        let end = (start + self.len).min(samples.len());
        &samples[start..end]
    }
}

/// Centered region of at most `max_secs` seconds.
pub fn select_window(total_len: usize, sample_rate: u32, max_secs: f32) -> AnalysisWindow {
    let ceiling = (max_secs.max(0.0) as f64 * sample_rate as f64).floor() as usize;
    let len = total_len.min(ceiling);
    let start = ((total_len - len) / 2).min(total_len - len);
    AnalysisWindow { start, len }
}
