//! Dominant-Color Object Localization
//!
//! Finds the largest region of a target color in each frame of a video
//! stream and outlines it with a bounding box.
//!
//! # Architecture
//!
//! Every frame takes the same path, and nothing is kept between frames:
//!
//! ```text
//! capture → color (convert, range) → segmentation (mask, contour) → render
//!                   ↑
//!               clustering (adaptive range only)
//! ```
//!
//! [`pipeline::FrameLoop`] drives this in lockstep against a
//! [`FrameSource`], a [`pipeline::DisplaySink`] and a
//! [`pipeline::CancellationSignal`].
//!
//! # Design Principles
//!
//! - **Stateless per frame**: ranges, masks and regions are rebuilt from scratch
//! - **Explicit configuration**: one immutable [`TrackerConfig`] built up front
//! - **Injected collaborators**: sources, sinks, signals and clusterers are traits
//! - **Silent degeneration is observable**: an inverted adaptive range is
//!   reported, not repaired
//!
//! # Example
//!
//! ```no_run
//! use chroma_track::{
//!     capture::{SyntheticSource, TrackerConfig},
//!     color::ColorSpace,
//!     pipeline::{FrameLoop, LogSink, Never, Pipeline},
//! };
//!
//! let config = TrackerConfig::new(ColorSpace::Hsv, false);
//! let source = SyntheticSource::new(640, 480, 30);
//!
//! let mut frame_loop = FrameLoop::new(Pipeline::new(config), source, LogSink, Never);
//! let summary = frame_loop.run().unwrap();
//!
//! println!("{} frames, {} with a region", summary.frames_processed, summary.regions_found);
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod clustering;
pub mod color;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod segmentation;

// Re-export commonly used types at crate root
pub use capture::{Frame, FrameSource, TrackerConfig};
pub use clustering::{ClusterAssignment, Clusterer, DominantColorClusterer, KMeans};
pub use color::{ColorRange, ColorSpace};
pub use pipeline::{FrameLoop, FrameReport, Pipeline};
pub use render::BoundingBox;
pub use segmentation::{Mask, Region};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
