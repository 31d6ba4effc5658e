//! Display sinks for annotated frames.

use crate::capture::Frame;
use crate::color::{convert, ColorSpace};
use std::path::{Path, PathBuf};

/// Receives annotated frames. Fire-and-forget: implementations log
/// their own failures and never report back.
pub trait DisplaySink {
    fn show(&mut self, frame: &Frame);
}

impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn show(&mut self, frame: &Frame) {
        (**self).show(frame)
    }
}

/// Logs each frame and discards it.
#[derive(Debug, Default)]
pub struct LogSink;

impl DisplaySink for LogSink {
    fn show(&mut self, frame: &Frame) {
        tracing::trace!(
            sequence = frame.sequence(),
            width = frame.width(),
            height = frame.height(),
            "Frame presented"
        );
    }
}

/// Writes each frame as a numbered PNG.
#[derive(Debug)]
pub struct ImageDirectorySink {
    dir: PathBuf,
    written: u64,
}

impl ImageDirectorySink {
    /// Creates the directory if needed.
    pub fn create(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        tracing::info!(dir = %dir.display(), "Writing annotated frames");
        Ok(Self { dir, written: 0 })
    }

    /// Number of frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn path_for(&self, frame: &Frame) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", frame.sequence()))
    }
}

impl DisplaySink for ImageDirectorySink {
    fn show(&mut self, frame: &Frame) {
        // PNG stores R, G, B
        let rgb = convert(frame, ColorSpace::Rgb);
        let path = self.path_for(frame);

        match rgb.image().save(&path) {
            Ok(()) => self.written += 1,
            Err(e) => tracing::warn!(path = %path.display(), "Failed to write frame: {}", e),
        }
    }
}

/// Streams each frame to a spawned Rerun viewer.
#[cfg(feature = "viewer")]
pub struct RerunSink {
    rec: rerun::RecordingStream,
}

#[cfg(feature = "viewer")]
impl RerunSink {
    /// Spawns a viewer process and connects to it.
    pub fn spawn(app_id: &str) -> Result<Self, rerun::RecordingStreamError> {
        let rec = rerun::RecordingStreamBuilder::new(app_id).spawn()?;
        tracing::info!(app_id, "Streaming frames to the viewer");
        Ok(Self { rec })
    }
}

#[cfg(feature = "viewer")]
impl DisplaySink for RerunSink {
    fn show(&mut self, frame: &Frame) {
        let rgb = convert(frame, ColorSpace::Rgb);
        let image = rerun::Image::from_elements(
            rgb.as_raw(),
            [rgb.width(), rgb.height()],
            rerun::ColorModel::RGB,
        );

        if let Err(e) = self.rec.log("frame", &image) {
            tracing::warn!(sequence = frame.sequence(), "Failed to stream frame: {}", e);
        }
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<Frame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl DisplaySink for RecordingSink {
    fn show(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}
