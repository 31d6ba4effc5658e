//! Frame sources.
//!
//! This module provides a trait-based abstraction over where frames come
//! from, so the frame loop can run against a camera, a directory of
//! images, or generated frames in tests.

use super::{CaptureConfig, Frame, FrameError, Pixel};
use crate::color::ColorSpace;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while acquiring frames.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("end of stream")]
    EndOfStream,
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open source: {0}")]
    OpenFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] FrameError),
}

impl CaptureError {
    /// Returns true for errors that must abort processing rather than
    /// just end the stream.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CaptureError::MalformedFrame(_))
    }
}

/// Produces frames in the native (B, G, R) color space.
pub trait FrameSource {
    /// Acquires the next frame.
    ///
    /// Returns [`CaptureError::EndOfStream`] once the source is exhausted.
    fn next_frame(&mut self) -> Result<Frame, CaptureError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        (**self).next_frame()
    }
}

/// Generates frames with a solid square sliding over a flat background.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    remaining: u64,
    sequence: u64,
    background: Pixel,
    target: Pixel,
}

impl SyntheticSource {
    /// Square color, a saturated blue in B, G, R order.
    pub const DEFAULT_TARGET: Pixel = [200, 60, 20];
    /// Neutral gray background.
    pub const DEFAULT_BACKGROUND: Pixel = [90, 90, 90];

    pub fn new(width: u32, height: u32, frame_count: u64) -> Self {
        Self {
            width,
            height,
            remaining: frame_count,
            sequence: 0,
            background: Self::DEFAULT_BACKGROUND,
            target: Self::DEFAULT_TARGET,
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.width, config.height, config.frame_count)
    }

    pub fn with_colors(mut self, background: Pixel, target: Pixel) -> Self {
        self.background = background;
        self.target = target;
        self
    }

    /// Top-left corner and side of the square in frame `sequence`, or
    /// `None` for a zero-sized frame.
    pub fn square_at(&self, sequence: u64) -> Option<(u32, u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let side = (self.width.min(self.height) / 4).max(1);
        let span_x = (self.width - side + 1) as u64;
        let span_y = (self.height - side + 1) as u64;
        let x = (sequence * 4 % span_x) as u32;
        let y = (sequence * 3 % span_y) as u32;
        Some((x, y, side))
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.remaining == 0 {
            return Err(CaptureError::EndOfStream);
        }
        let Some((x0, y0, side)) = self.square_at(self.sequence) else {
            return Err(CaptureError::OpenFailed("zero-sized synthetic frame".into()));
        };
        let mut image = RgbImage::from_pixel(self.width, self.height, Rgb(self.background));
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                image.put_pixel(x, y, Rgb(self.target));
            }
        }

        self.remaining -= 1;
        self.sequence += 1;
        Ok(Frame::from_image(image, ColorSpace::Bgr, self.sequence))
    }
}

/// Reads image files from a directory in lexical order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: std::vec::IntoIter<PathBuf>,
    sequence: u64,
}

impl ImageSequenceSource {
    const EXTENSIONS: [&'static str; 4] = ["png", "jpg", "jpeg", "bmp"];

    /// Lists the images in `dir`. Other files are skipped.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| CaptureError::OpenFailed(format!("{}: {}", dir.display(), e)))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| Self::EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        tracing::info!(dir = %dir.display(), images = paths.len(), "Image sequence opened");

        Ok(Self {
            paths: paths.into_iter(),
            sequence: 0,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        let path = self.paths.next().ok_or(CaptureError::EndOfStream)?;

        let mut image = image::open(&path)
            .map_err(|e| CaptureError::Decode {
                path: path.clone(),
                message: e.to_string(),
            })?
            .to_rgb8();

        // Files decode as R, G, B; frames are native B, G, R
        for p in image.pixels_mut() {
            p.0.swap(0, 2);
        }

        self.sequence += 1;
        tracing::trace!(path = %path.display(), sequence = self.sequence, "Image loaded");
        Ok(Frame::from_image(image, ColorSpace::Bgr, self.sequence))
    }
}

/// Yields prepared frames in order, then ends.
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: std::collections::VecDeque<Result<Frame, CaptureError>>,
}

impl FrameQueue {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().map(Ok).collect(),
        }
    }

    /// Queues an error to be returned after the frames queued so far.
    pub fn push_error(&mut self, error: CaptureError) {
        self.frames.push_back(Err(error));
    }
}

impl FrameSource for FrameQueue {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        self.frames.pop_front().unwrap_or(Err(CaptureError::EndOfStream))
    }
}
