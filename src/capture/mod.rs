//! Frame input and configuration.
//!
//! This module provides the [`Frame`] type, the [`FrameSource`]
//! abstraction with its built-in sources, and the configuration the
//! rest of the pipeline is built from.

#[cfg(feature = "camera")]
mod camera;
mod config;
mod frame;
mod source;

#[cfg(feature = "camera")]
pub use camera::NokhwaCamera;
pub use config::{
    CaptureConfig, ClusteringConfig, ConfigError, FileConfig, OutputConfig, OverlayConfig,
    SourceKind, TrackerConfig,
};
pub use frame::{Frame, FrameError, Pixel, CHANNELS};
pub use source::{CaptureError, FrameQueue, FrameSource, ImageSequenceSource, SyntheticSource};
