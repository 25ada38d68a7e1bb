use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use frontier_hot_preview::image_pipeline::{ConversionConfig, RawToTiffPipeline, TiffCompression};
use frontier_hot_preview::logger;
use frontier_hot_preview::preview::{FilePreviewSink, Platform, SinkKind, SystemViewer};
use frontier_hot_preview::watcher::{ScanFileHandler, ScanWatcher, SettlePolicy, WatchConfig};

#[derive(Parser)]
#[command(name = "frontier-hot-preview")]
#[command(version, about = "Preview Frontier raw scans as soon as they are written", long_about = None)]
struct Cli {
    /// Path to your Frontier PIC/export machine's D drive
    #[arg(long, value_name = "DIR")]
    path: Option<PathBuf>,

    /// Where previews are shown
    #[arg(long, value_enum, default_value_t = SinkKind::File)]
    sink: SinkKind,

    /// Compression of the preview TIFF
    #[arg(long, value_enum, default_value_t = TiffCompression::None)]
    compression: TiffCompression,

    /// Longest wait for a new scan to finish writing, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    settle_timeout_ms: u64,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn default_watch_path() -> Option<PathBuf> {
    if cfg!(windows) {
        Some(PathBuf::from(r"D:\Inspool"))
    } else {
        None
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = cli
        .path
        .or_else(default_watch_path)
        .context("No directory specified by --path")?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("Failed to install interrupt handler")?;
    }

    let config = ConversionConfig::builder()
        .compression(cli.compression)
        .build();
    let pipeline = RawToTiffPipeline::new(config);
    info!("Preview compression: {:?}", pipeline.config().compression);
    let settle = SettlePolicy::builder()
        .timeout(Duration::from_millis(cli.settle_timeout_ms))
        .build();
    let watch_config = WatchConfig::builder(root).build();

    let tmpdir = tempfile::Builder::new()
        .prefix("frontier-hot-preview")
        .tempdir()
        .context("Failed to create preview directory")?;

    match cli.sink {
        SinkKind::File => {
            if let Err(e) = Platform::current() {
                warn!("{e}; previews will be written but not opened");
            }
            let sink = FilePreviewSink::new(tmpdir.path(), SystemViewer::new());
            info!("Previews go to {}", sink.preview_path().display());

            let mut watcher = ScanWatcher::new(watch_config, ScanFileHandler::new(pipeline, sink, settle));
            watcher.start()?;
            info!("Press Ctrl-C to stop");
            watcher.run_until(&stop)?;
        }
        SinkKind::Display => run_display(watch_config, pipeline, settle, stop)?,
    }

    tmpdir.close().context("Failed to remove preview directory")?;
    info!("Bye");
    Ok(())
}

#[cfg(feature = "display")]
fn run_display(
    watch_config: WatchConfig,
    pipeline: RawToTiffPipeline,
    settle: SettlePolicy,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    use frontier_hot_preview::preview::display;

    let (sink, window) = display::channel(stop.clone());
    let mut watcher = ScanWatcher::new(watch_config, ScanFileHandler::new(pipeline, sink, settle));
    watcher.start()?;

    let worker_stop = stop.clone();
    let worker = std::thread::spawn(move || watcher.run_until(&worker_stop));

    let shown = window.run("Frontier hot preview");
    stop.store(true, Ordering::SeqCst);

    let watched = worker
        .join()
        .map_err(|_| anyhow::anyhow!("Watcher thread panicked"))?;
    shown.map_err(|e| anyhow::anyhow!("Preview window failed: {e}"))?;
    watched?;
    Ok(())
}

#[cfg(not(feature = "display"))]
fn run_display(
    _watch_config: WatchConfig,
    _pipeline: RawToTiffPipeline,
    _settle: SettlePolicy,
    _stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    anyhow::bail!("--sink display needs a build with the `display` feature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["frontier-hot-preview", "--path", "scans", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.settle_timeout_ms, 5000);

        let cli = Cli::try_parse_from(["frontier-hot-preview", "--path", "scans"]).unwrap();
        assert!(!cli.verbose);
    }
}
