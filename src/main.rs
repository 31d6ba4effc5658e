//! Chroma Track CLI
//!
//! Runs the color-segmentation pipeline over a frame source and writes
//! or logs the annotated frames.

use chroma_track::{
    capture::{
        CaptureError, FileConfig, FrameSource, ImageSequenceSource, SourceKind, SyntheticSource,
    },
    color::ColorSpace,
    metrics::MetricsRegistry,
    pipeline::{
        CtrlCSignal, DisplaySink, FrameBudget, FrameLoop, ImageDirectorySink, LogSink, Never,
        Pipeline,
    },
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "chroma-track", version, about)]
struct Args {
    /// Working color space
    #[arg(short = 'c', long, value_enum)]
    color_space: Option<ColorSpace>,

    /// Derive the color range from the dominant k-means cluster
    #[arg(long)]
    kmeans: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame source
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Image directory for the directory source
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory to write annotated frames to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Stream annotated frames to a live viewer (requires the `viewer` feature)
    #[arg(long)]
    viewer: bool,
}

impl Args {
    /// Loads the file configuration and applies command-line overrides.
    fn resolve(&self) -> Result<FileConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        if let Some(space) = self.color_space {
            config.tracker.color_space = space;
        }
        if self.kmeans {
            config.tracker.adaptive_clustering = true;
        }
        if let Some(source) = self.source {
            config.capture.source = source;
        }
        if let Some(input) = &self.input {
            config.capture.input_dir = Some(input.clone());
            if self.source.is_none() {
                config.capture.source = SourceKind::Directory;
            }
        }
        if let Some(output) = &self.output {
            config.output.output_dir = Some(output.clone());
        }
        if let Some(frames) = self.frames {
            config.output.frame_limit = frames;
        }
        if self.viewer {
            config.output.viewer = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn open_source(config: &FileConfig) -> Result<Box<dyn FrameSource>, CaptureError> {
    match config.capture.source {
        SourceKind::Synthetic => Ok(Box::new(SyntheticSource::from_config(&config.capture))),
        SourceKind::Directory => {
            let dir = config
                .capture
                .input_dir
                .as_ref()
                .ok_or_else(|| CaptureError::OpenFailed("no input directory".into()))?;
            Ok(Box::new(ImageSequenceSource::open(dir)?))
        }
        #[cfg(feature = "camera")]
        SourceKind::Camera => Ok(Box::new(chroma_track::capture::NokhwaCamera::open(
            &config.capture,
        )?)),
        #[cfg(not(feature = "camera"))]
        SourceKind::Camera => Err(CaptureError::OpenFailed(
            "built without the `camera` feature".into(),
        )),
    }
}

fn open_sink(config: &FileConfig) -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    if config.output.viewer {
        return open_viewer();
    }
    match &config.output.output_dir {
        Some(dir) => Ok(Box::new(ImageDirectorySink::create(dir)?)),
        None => Ok(Box::new(LogSink)),
    }
}

#[cfg(feature = "viewer")]
fn open_viewer() -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    Ok(Box::new(chroma_track::pipeline::RerunSink::spawn(
        "Chroma Track",
    )?))
}

#[cfg(not(feature = "viewer"))]
fn open_viewer() -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    Err("built without the `viewer` feature".into())
}

#[cfg(feature = "metrics")]
fn start_metrics_server(
    registry: &MetricsRegistry,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    use chroma_track::metrics::MetricsServer;

    if port == 0 {
        return Ok(());
    }
    // Detached; lives until the process exits
    MetricsServer::new(port, registry.clone()).spawn()?;
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn start_metrics_server(
    _registry: &MetricsRegistry,
    _port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve()?;

    info!(
        color_space = %config.tracker.color_space,
        adaptive = config.tracker.adaptive_clustering,
        source = ?config.capture.source,
        "Configuration loaded"
    );

    let source = open_source(&config)?;
    let sink = open_sink(&config)?;
    let interrupt = CtrlCSignal::install()?;

    let registry = MetricsRegistry::new()?;
    start_metrics_server(&registry, config.output.metrics_port)?;

    let pipeline = Pipeline::new(config.tracker.clone());
    let summary = if config.output.frame_limit > 0 {
        let signal = (interrupt, FrameBudget::new(config.output.frame_limit));
        FrameLoop::new(pipeline, source, sink, signal)
            .with_metrics(registry)
            .run()?
    } else {
        FrameLoop::new(pipeline, source, sink, (interrupt, Never))
            .with_metrics(registry)
            .run()?
    };

    info!(
        "Processed {} frames, {} with a region ({:?})",
        summary.frames_processed, summary.regions_found, summary.stop_reason
    );
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Chroma Track v{}", chroma_track::VERSION);

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
