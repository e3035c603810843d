use std::cell::Cell;

use crate::error::{AnalyzerError, AnalyzerResult};

use super::bands::{compress_into, DEFAULT_BAND_COUNT};
use super::features::AnalysisFrame;
use super::loudness::rms;

pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING: f32 = 0.9;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Band widths double every two bands; past this they no longer fit a usize.
pub const MAX_BAND_COUNT: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub fft_size: usize,
    /// Temporal smoothing for the transform stage; the analysis math ignores it.
    pub smoothing: f32,
    pub sample_rate: u32,
    pub band_count: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            smoothing: DEFAULT_SMOOTHING,
            sample_rate: DEFAULT_SAMPLE_RATE,
            band_count: DEFAULT_BAND_COUNT,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> AnalyzerResult<()> {
        validate_fft_size(self.fft_size)?;
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(AnalyzerError::Configuration(format!(
                "smoothing must be within 0.0-1.0, got {}",
                self.smoothing
            )));
        }
        if self.band_count > MAX_BAND_COUNT {
            return Err(AnalyzerError::Configuration(format!(
                "band count must be at most {}, got {}",
                MAX_BAND_COUNT, self.band_count
            )));
        }
        if self.sample_rate == 0 {
            return Err(AnalyzerError::Configuration(
                "sample rate must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Number of magnitude bins per frame.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

pub(crate) fn validate_fft_size(fft_size: usize) -> AnalyzerResult<()> {
    if fft_size < 2 || !fft_size.is_power_of_two() {
        return Err(AnalyzerError::Configuration(format!(
            "FFT size must be a power of two of at least 2, got {}",
            fft_size
        )));
    }
    Ok(())
}

/// Peak-normalized loudness and log-band analysis over per-frame spectrum snapshots.
///
/// Call [`update`](Self::update) once per audio frame; the queries on
/// [`frame`](Self::frame) read the derived state. `update` mutates the owned
/// arrays in place, so a reader on another thread must go through
/// [`crate::snapshot`] instead of sharing the analyzer, or it may see a
/// half-written frame.
#[derive(Debug)]
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    frame: AnalysisFrame,
    last_reported_volume: Cell<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, smoothing: f32) -> AnalyzerResult<Self> {
        Self::with_config(AnalyzerConfig {
            fft_size,
            smoothing,
            ..AnalyzerConfig::default()
        })
    }

    pub fn with_config(config: AnalyzerConfig) -> AnalyzerResult<Self> {
        config.validate()?;
        log::debug!(
            "Analyzer: fft_size={}, bins={}, bands={}, sample_rate={}Hz",
            config.fft_size,
            config.bin_count(),
            config.band_count,
            config.sample_rate
        );
        Ok(Self {
            frame: AnalysisFrame::empty(config.fft_size, config.sample_rate, config.band_count),
            config,
            last_reported_volume: Cell::new(0.0),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn smoothing(&self) -> f32 {
        self.config.smoothing
    }

    /// Replaces the current snapshot and recomputes bands, volume and peak.
    ///
    /// Both slices must hold exactly `fft_size / 2` samples; on a mismatch
    /// nothing is modified.
    pub fn update(&mut self, magnitudes: &[u8], waveform: &[f32]) -> AnalyzerResult<()> {
        let expected = self.config.bin_count();
        if magnitudes.len() != expected || waveform.len() != expected {
            return Err(AnalyzerError::Dimension {
                expected,
                magnitudes: magnitudes.len(),
                waveform: waveform.len(),
            });
        }

        let frame = &mut self.frame;
        frame.magnitudes.copy_from_slice(magnitudes);
        frame.waveform.copy_from_slice(waveform);

        compress_into(&frame.magnitudes, self.config.band_count, &mut frame.bands);

        frame.current_volume = rms(frame.magnitudes.iter().copied());
        if frame.current_volume > frame.peak_volume {
            log::trace!(
                "Peak volume {:.3} -> {:.3}",
                frame.peak_volume,
                frame.current_volume
            );
            frame.peak_volume = frame.current_volume;
        }
        Ok(())
    }

    /// Derived state of the latest frame.
    pub fn frame(&self) -> &AnalysisFrame {
        &self.frame
    }

    pub fn waveform(&self) -> &[f32] {
        self.frame.waveform()
    }

    pub fn spectrum(&self) -> &[f32] {
        self.frame.spectrum()
    }

    pub fn current_volume(&self) -> f32 {
        self.frame.current_volume()
    }

    pub fn peak_volume(&self) -> f32 {
        self.frame.peak_volume()
    }

    /// Same as [`AnalysisFrame::volume`], but also records the value as the
    /// last reported volume. Prefer `frame().volume()` in new code; the
    /// recorded value is kept only for callers that poll it.
    pub fn volume(&self) -> f32 {
        let v = self.frame.volume();
        self.last_reported_volume.set(v);
        v
    }

    pub fn last_reported_volume(&self) -> f32 {
        self.last_reported_volume.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_power_of_two_fft_size() {
        for size in [0, 1, 3, 1000, 2047] {
            assert!(matches!(
                SpectrumAnalyzer::new(size, 0.9),
                Err(AnalyzerError::Configuration(_))
            ));
        }
        assert!(SpectrumAnalyzer::new(2, 0.9).is_ok());
    }

    #[test]
    fn rejects_out_of_range_smoothing() {
        assert!(SpectrumAnalyzer::new(1024, 1.5).is_err());
        assert!(SpectrumAnalyzer::new(1024, f32::NAN).is_err());
        assert!(SpectrumAnalyzer::new(1024, 0.0).is_ok());
    }

    #[test]
    fn rejects_band_counts_past_the_limit() {
        let config = AnalyzerConfig {
            band_count: usize::MAX,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            SpectrumAnalyzer::with_config(config),
            Err(AnalyzerError::Configuration(_))
        ));

        let config = AnalyzerConfig {
            band_count: MAX_BAND_COUNT,
            ..AnalyzerConfig::default()
        };
        assert!(SpectrumAnalyzer::with_config(config).is_ok());
    }

    #[test]
    fn starts_zeroed() {
        let analyzer = SpectrumAnalyzer::with_config(AnalyzerConfig::default()).unwrap();
        assert_eq!(analyzer.frame().raw_spectrum().len(), 1024);
        assert_eq!(analyzer.waveform().len(), 1024);
        assert!(analyzer.spectrum().is_empty());
        assert_eq!(analyzer.current_volume(), 0.0);
        assert_eq!(analyzer.peak_volume(), 0.0);
        assert_eq!(analyzer.smoothing(), 0.9);
    }

    #[test]
    fn small_frame_scenario() {
        let mut analyzer = SpectrumAnalyzer::new(8, 0.9).unwrap();
        analyzer.update(&[0, 10, 20, 30], &[0.0; 4]).unwrap();

        assert_relative_eq!(analyzer.current_volume(), 21.602, epsilon = 1e-3);
        assert_relative_eq!(analyzer.peak_volume(), analyzer.current_volume());
        assert_eq!(analyzer.volume(), 100.0);
        assert_eq!(analyzer.last_reported_volume(), 100.0);
        assert_eq!(analyzer.spectrum().len(), 16);
    }

    #[test]
    fn silent_frame_keeps_peak() {
        let mut analyzer = SpectrumAnalyzer::new(8, 0.9).unwrap();
        analyzer.update(&[0, 10, 20, 30], &[0.0; 4]).unwrap();
        let peak = analyzer.peak_volume();

        analyzer.update(&[0; 4], &[0.0; 4]).unwrap();
        assert_eq!(analyzer.current_volume(), 0.0);
        assert_eq!(analyzer.peak_volume(), peak);
        assert_eq!(analyzer.volume(), 0.0);
    }

    #[test]
    fn peak_never_decreases() {
        let mut analyzer = SpectrumAnalyzer::new(16, 0.5).unwrap();
        let frames: [[u8; 8]; 5] = [
            [5, 5, 5, 5, 0, 0, 0, 0],
            [50, 40, 0, 0, 0, 0, 0, 0],
            [1, 0, 0, 0, 0, 0, 0, 0],
            [255; 8],
            [3; 8],
        ];
        let mut last_peak = 0.0;
        for magnitudes in frames {
            analyzer.update(&magnitudes, &[0.0; 8]).unwrap();
            assert!(analyzer.peak_volume() >= last_peak);
            assert!(analyzer.volume() <= 100.0);
            last_peak = analyzer.peak_volume();
        }
        assert_relative_eq!(last_peak, 255.0);
    }

    #[test]
    fn mismatched_lengths_leave_state_untouched() {
        let mut analyzer = SpectrumAnalyzer::new(8, 0.9).unwrap();
        analyzer.update(&[1, 2, 3, 4], &[0.1; 4]).unwrap();
        let before = analyzer.frame().clone();

        let err = analyzer.update(&[1, 2, 3], &[0.0; 4]).unwrap_err();
        assert_eq!(
            err,
            AnalyzerError::Dimension {
                expected: 4,
                magnitudes: 3,
                waveform: 4
            }
        );
        assert!(analyzer.update(&[1, 2, 3, 4], &[0.0; 5]).is_err());
        assert_eq!(analyzer.frame(), &before);
    }

    #[test]
    fn update_does_not_grow_band_storage() {
        let mut analyzer = SpectrumAnalyzer::new(2048, 0.9).unwrap();
        analyzer.update(&[7; 1024], &[0.0; 1024]).unwrap();
        let capacity = analyzer.frame().bands.capacity();
        for _ in 0..10 {
            analyzer.update(&[9; 1024], &[0.0; 1024]).unwrap();
        }
        assert_eq!(analyzer.frame().bands.capacity(), capacity);
        assert_eq!(analyzer.spectrum(), &[9.0; 16][..]);
    }
}
