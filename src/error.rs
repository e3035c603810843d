use thiserror::Error;

/// Failures surfaced by the analysis core and the stages that feed it.
///
/// Degenerate arithmetic (zero peak, empty arrays, all-zero frames) is never an
/// error here: those cases fall back to 0 locally so a visualization keeps
/// drawing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyzerError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error(
        "frame size mismatch: expected {expected} samples, got {magnitudes} magnitudes and {waveform} waveform samples"
    )]
    Dimension {
        expected: usize,
        magnitudes: usize,
        waveform: usize,
    },

    #[error("audio input unavailable: {0}")]
    UnsupportedEnvironment(String),
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;
