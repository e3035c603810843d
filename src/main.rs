mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufWriter, Write};

use cli::{Cli, Format};
use micspectrum::audio::analysis::{DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING};
use micspectrum::audio::bands::DEFAULT_BAND_COUNT;
use micspectrum::audio::decode::decode_audio;
use micspectrum::audio::source::FrameSource;
use micspectrum::audio::transform::SpectrumTransform;
use micspectrum::config;
use micspectrum::report::FrameReport;
use micspectrum::SpectrumAnalyzer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    if let Some(path) = config::find_config(cli.config.as_deref()) {
        if let Some(cfg) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.fft_size == DEFAULT_FFT_SIZE { cli.fft_size = cfg.analyzer.fft_size; }
            if cli.smoothing == DEFAULT_SMOOTHING { cli.smoothing = cfg.analyzer.smoothing; }
            if cli.bands == DEFAULT_BAND_COUNT { cli.bands = cfg.analyzer.bands; }
            if cli.hop.is_none() { cli.hop = cfg.analyzer.hop; }
            if cli.every == 1 { cli.every = cfg.output.every; }
            if cli.format == Format::Text {
                match Format::from_name(&cfg.output.format) {
                    Some(format) => cli.format = format,
                    None => log::warn!("Unknown output format in config: {}", cfg.output.format),
                }
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("Input: {}", input.display());
    let audio = decode_audio(input)?;

    let settings = config::AnalyzerSection {
        fft_size: cli.fft_size,
        smoothing: cli.smoothing,
        bands: cli.bands,
        hop: cli.hop,
    };
    let mut analyzer = SpectrumAnalyzer::with_config(settings.analyzer_config(audio.sample_rate))
        .context("Invalid analyzer settings")?;
    let mut transform = SpectrumTransform::new(cli.fft_size, cli.smoothing)?;

    let hop = cli.hop.unwrap_or(cli.fft_size * 2);
    let source = FrameSource::new(&audio, cli.fft_size, hop);
    let total_frames = source.frame_count();
    let every = cli.every.max(1);
    log::info!(
        "Analyzing {} frames ({:.1}s): fft_size={}, hop={}, bands={}, smoothing={:.2}",
        total_frames,
        audio.duration(),
        cli.fft_size,
        hop,
        cli.bands,
        cli.smoothing
    );

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for window in source {
        transform.process(window.samples);
        analyzer.update(transform.magnitudes(), transform.waveform())?;

        if window.index % every == 0 {
            let report = FrameReport::from_frame(window.index, window.time, analyzer.frame());
            let line = match cli.format {
                Format::Json => report.to_json()?,
                Format::Text => report.to_text(),
            };
            pb.suspend(|| writeln!(out, "{}", line))
                .context("Failed to write report")?;
        }
        pb.inc(1);
    }

    out.flush()?;
    pb.finish_with_message("Analysis complete");

    log::info!(
        "Done! peak volume {:.2}, final volume {:.1}",
        analyzer.peak_volume(),
        analyzer.volume()
    );
    Ok(())
}
