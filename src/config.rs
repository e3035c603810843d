use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::analysis::{AnalyzerConfig, DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING};
use crate::audio::bands::DEFAULT_BAND_COUNT;

pub const CONFIG_FILE_NAME: &str = "micspectrum.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzerSection {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_bands")]
    pub bands: usize,
    /// Samples between analyzed frames; `None` means twice the FFT size.
    #[serde(default)]
    pub hop: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_every")]
    pub every: usize,
}

impl Default for AnalyzerSection {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            smoothing: default_smoothing(),
            bands: default_bands(),
            hop: None,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            every: default_every(),
        }
    }
}

impl AnalyzerSection {
    pub fn analyzer_config(&self, sample_rate: u32) -> AnalyzerConfig {
        AnalyzerConfig {
            fft_size: self.fft_size,
            smoothing: self.smoothing,
            sample_rate,
            band_count: self.bands,
        }
    }
}

fn default_fft_size() -> usize { DEFAULT_FFT_SIZE }
fn default_smoothing() -> f32 { DEFAULT_SMOOTHING }
fn default_bands() -> usize { DEFAULT_BAND_COUNT }
fn default_format() -> String { "text".into() }
fn default_every() -> usize { 1 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Option<Config> {
    toml::from_str(content).ok()
}

/// Explicit path first, then `./micspectrum.toml`, then the user config directories.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("micspectrum").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("micspectrum").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.analyzer.fft_size, 2048);
        assert_eq!(cfg.analyzer.smoothing, 0.9);
        assert_eq!(cfg.analyzer.bands, 16);
        assert_eq!(cfg.analyzer.hop, None);
        assert_eq!(cfg.output.format, "text");
        assert_eq!(cfg.output.every, 1);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = parse_config(
            r#"
            [analyzer]
            fft_size = 1024
            hop = 512

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analyzer.fft_size, 1024);
        assert_eq!(cfg.analyzer.hop, Some(512));
        assert_eq!(cfg.analyzer.smoothing, 0.9);
        assert_eq!(cfg.output.format, "json");

        let analyzer = cfg.analyzer.analyzer_config(48_000);
        assert_eq!(analyzer.sample_rate, 48_000);
        assert_eq!(analyzer.bin_count(), 512);
    }

    #[test]
    fn malformed_file_is_ignored() {
        assert!(parse_config("analyzer = [").is_none());
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/custom.toml");
        assert_eq!(find_config(Some(path)), Some(path.to_path_buf()));
    }
}
