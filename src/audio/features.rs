use super::loudness::{map_range, rms};
use super::mix::{bin_frequency, Band, BandMix};

/// Caller-chosen output range for mapped queries. Defaults to `0..100`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputRange {
    pub min: f32,
    pub max: f32,
}

impl OutputRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn clamp(&self, value: f32) -> f32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value.clamp(lo, hi)
    }
}

impl Default for OutputRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Derived state for the most recent audio frame.
///
/// Every query is a pure read. Mapped outputs are normalized against the
/// running peak volume and clamped into the requested [`OutputRange`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisFrame {
    pub(crate) sample_rate: u32,
    pub(crate) fft_size: usize,
    pub(crate) magnitudes: Vec<u8>,
    pub(crate) waveform: Vec<f32>,
    pub(crate) bands: Vec<f32>,
    pub(crate) current_volume: f32,
    pub(crate) peak_volume: f32,
}

impl AnalysisFrame {
    pub(crate) fn empty(fft_size: usize, sample_rate: u32, band_count: usize) -> Self {
        let bins = fft_size / 2;
        Self {
            sample_rate,
            fft_size,
            magnitudes: vec![0; bins],
            waveform: vec![0.0; bins],
            bands: Vec::with_capacity(band_count),
            current_volume: 0.0,
            peak_volume: 0.0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Time-domain samples of the current frame.
    pub fn waveform(&self) -> &[f32] {
        &self.waveform
    }

    /// Compressed log bands. Empty until the first update.
    pub fn spectrum(&self) -> &[f32] {
        &self.bands
    }

    /// Linear byte magnitudes as supplied by the transform stage.
    pub fn raw_spectrum(&self) -> &[u8] {
        &self.magnitudes
    }

    pub fn current_volume(&self) -> f32 {
        self.current_volume
    }

    pub fn peak_volume(&self) -> f32 {
        self.peak_volume
    }

    /// Current volume on a 0-100 scale relative to the loudest frame seen so far.
    pub fn volume(&self) -> f32 {
        self.map_to(self.current_volume, OutputRange::default())
    }

    pub fn map_waveform(&self, index: usize, total: usize, range: OutputRange) -> f32 {
        let len = self.waveform.len();
        match pick_position(index, total, len, len / 2) {
            Some(pos) => self.map_to(self.waveform[pos], range),
            None => 0.0,
        }
    }

    pub fn map_sound(&self, index: usize, total: usize, range: OutputRange) -> f32 {
        let len = self.bands.len();
        match pick_position(index, total, len, len) {
            Some(pos) => self.map_to(self.bands[pos], range),
            None => 0.0,
        }
    }

    pub fn map_raw_sound(&self, index: usize, total: usize, range: OutputRange) -> f32 {
        let len = self.magnitudes.len();
        match pick_position(index, total, len, len / 2) {
            Some(pos) => self.map_to(self.magnitudes[pos] as f32, range),
            None => 0.0,
        }
    }

    /// Splits the raw bins into bass, mids and highs, each mapped to 0-100.
    pub fn mix(&self) -> BandMix {
        let range = OutputRange::default();
        self.split_bins(|m| self.map_to(m, range))
    }

    pub fn bass(&self) -> Vec<f32> {
        self.mix().bass
    }

    pub fn mids(&self) -> Vec<f32> {
        self.mix().mids
    }

    pub fn highs(&self) -> Vec<f32> {
        self.mix().highs
    }

    /// Reserved band; always empty.
    pub fn snares(&self) -> Vec<f32> {
        self.mix().snares
    }

    // Bins are mapped to 0-100 against the peak without clamping, and the RMS
    // of each band is mapped against the peak a second time. Only the final
    // value is clamped.
    pub fn bass_volume(&self, range: OutputRange) -> f32 {
        self.band_volume(&self.unclamped_mix().bass, range)
    }

    pub fn mids_volume(&self, range: OutputRange) -> f32 {
        self.band_volume(&self.unclamped_mix().mids, range)
    }

    pub fn highs_volume(&self, range: OutputRange) -> f32 {
        self.band_volume(&self.unclamped_mix().highs, range)
    }

    pub fn snares_volume(&self, range: OutputRange) -> f32 {
        self.band_volume(&self.unclamped_mix().snares, range)
    }

    fn unclamped_mix(&self) -> BandMix {
        self.split_bins(|m| map_range(m, 0.0, self.peak_volume, 0.0, 100.0))
    }

    fn split_bins(&self, map: impl Fn(f32) -> f32) -> BandMix {
        let mut mix = BandMix::default();
        for (i, &m) in self.magnitudes.iter().enumerate() {
            let freq = bin_frequency(i, self.sample_rate, self.fft_size);
            mix.push(Band::classify(freq), map(m as f32));
        }
        mix
    }

    fn band_volume(&self, values: &[f32], range: OutputRange) -> f32 {
        self.map_to(rms(values.iter().copied()), range)
    }

    fn map_to(&self, value: f32, range: OutputRange) -> f32 {
        let mapped = map_range(value, 0.0, self.peak_volume, range.min, range.max);
        range.clamp(mapped)
    }
}

/// Index proportional to `index / total` within `span`, bounded to a sequence
/// of length `len`. `None` when there is nothing to pick from.
fn pick_position(index: usize, total: usize, len: usize, span: usize) -> Option<usize> {
    if len == 0 || total == 0 {
        return None;
    }
    let pos = (index as f64 / total as f64 * span as f64).floor() as usize;
    Some(pos.min(len - 1))
}
