use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::analysis::validate_fft_size;
use crate::error::AnalyzerResult;

pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;

/// Turns fixed-size sample windows into the byte magnitudes and waveform the
/// analyzer consumes, smoothing magnitudes across frames the way a browser
/// analyser node does.
pub struct SpectrumTransform {
    fft_size: usize,
    smoothing: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    magnitudes: Vec<u8>,
    waveform: Vec<f32>,
}

impl SpectrumTransform {
    pub fn new(fft_size: usize, smoothing: f32) -> AnalyzerResult<Self> {
        validate_fft_size(fft_size)?;
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let bins = fft_size / 2;

        Ok(Self {
            fft_size,
            smoothing: smoothing.clamp(0.0, 1.0),
            window: blackman_window(fft_size),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()],
            fft,
            smoothed: vec![0.0; bins],
            magnitudes: vec![0; bins],
            waveform: vec![0.0; bins],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Processes one window of `fft_size` samples. Shorter input is zero-padded.
    pub fn process(&mut self, samples: &[f32]) {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let tau = self.smoothing;
        for (k, byte) in self.magnitudes.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * scale;
            let y = tau * self.smoothed[k] + (1.0 - tau) * magnitude;
            // non-finite history would poison every later frame
            self.smoothed[k] = if y.is_finite() { y } else { 0.0 };
            *byte = decibels_to_byte(linear_to_decibels(self.smoothed[k]));
        }

        for (i, w) in self.waveform.iter_mut().enumerate() {
            *w = samples.get(i).copied().unwrap_or(0.0);
        }
    }

    pub fn magnitudes(&self) -> &[u8] {
        &self.magnitudes
    }

    pub fn waveform(&self) -> &[f32] {
        &self.waveform
    }
}

fn linear_to_decibels(value: f32) -> f32 {
    if value <= 0.0 {
        return f32::NEG_INFINITY;
    }
    20.0 * value.log10()
}

fn decibels_to_byte(db: f32) -> u8 {
    let scaled = ((db - MIN_DECIBELS) * 255.0 / (MAX_DECIBELS - MIN_DECIBELS)).floor();
    scaled.clamp(0.0, 255.0) as u8
}

fn blackman_window(size: usize) -> Vec<f32> {
    const ALPHA: f32 = 0.16;
    let a0 = 0.5 * (1.0 - ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * ALPHA;
    let n = size as f32;
    (0..size)
        .map(|i| {
            let x = 2.0 * std::f32::consts::PI * i as f32 / n;
            a0 - a1 * x.cos() + a2 * (2.0 * x).cos()
        })
        .collect()
}
