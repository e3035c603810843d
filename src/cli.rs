use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use micspectrum::audio::analysis::{DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING};
use micspectrum::audio::bands::DEFAULT_BAND_COUNT;

#[derive(Parser, Debug)]
#[command(name = "micspectrum", about = "Peak-normalized spectrum and loudness analysis of audio files")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// FFT window length in samples (power of two)
    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    pub fft_size: usize,

    /// Temporal smoothing of magnitudes between frames (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_SMOOTHING)]
    pub smoothing: f32,

    /// Number of compressed log bands
    #[arg(long, default_value_t = DEFAULT_BAND_COUNT)]
    pub bands: usize,

    /// Samples between analyzed frames (default: twice the FFT size)
    #[arg(long)]
    pub hop: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Print every Nth frame
    #[arg(long, default_value_t = 1)]
    pub every: usize,

    /// Config file (default: ./micspectrum.toml or the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name, true).ok()
    }
}
