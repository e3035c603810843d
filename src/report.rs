use serde::Serialize;

use crate::audio::features::{AnalysisFrame, OutputRange};

/// Per-frame summary printed by the CLI.
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub index: usize,
    pub time: f32,
    pub volume: f32,
    pub peak_volume: f32,
    pub bass: f32,
    pub mids: f32,
    pub highs: f32,
    pub bands: Vec<f32>,
}

impl FrameReport {
    pub fn from_frame(index: usize, time: f32, frame: &AnalysisFrame) -> Self {
        let range = OutputRange::default();
        let bands = (0..frame.spectrum().len())
            .map(|i| frame.map_sound(i, frame.spectrum().len(), range))
            .collect();

        Self {
            index,
            time,
            volume: frame.volume(),
            peak_volume: frame.peak_volume(),
            bass: frame.bass_volume(range),
            mids: frame.mids_volume(range),
            highs: frame.highs_volume(range),
            bands,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Single text line: timing, loudness, then a bar per compressed band.
    pub fn to_text(&self) -> String {
        let bars: String = self.bands.iter().map(|&b| level_glyph(b)).collect();
        format!(
            "{:>6} {:>8.3}s vol {:>5.1} bass {:>5.1} mids {:>5.1} highs {:>5.1} |{}|",
            self.index, self.time, self.volume, self.bass, self.mids, self.highs, bars
        )
    }
}

fn level_glyph(value: f32) -> char {
    const GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let step = (value.clamp(0.0, 100.0) / 100.0 * 8.0).round() as usize;
    GLYPHS[step.min(8)]
}
