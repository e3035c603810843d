//! Peak-normalized loudness, log-band compression and bass/mids/highs
//! summaries over per-frame spectrum snapshots.

pub mod audio;
pub mod config;
pub mod error;
pub mod report;
pub mod snapshot;

pub use audio::analysis::{AnalyzerConfig, SpectrumAnalyzer};
pub use audio::features::{AnalysisFrame, OutputRange};
pub use audio::mix::BandMix;
pub use error::{AnalyzerError, AnalyzerResult};
