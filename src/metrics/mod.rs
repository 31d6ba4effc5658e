//! Prometheus metrics for the frame loop.
//!
//! # Metrics Exposed
//!
//! ## Counters
//! - `chroma_track_frames_processed_total` - Frames run through the pipeline
//! - `chroma_track_regions_found_total` - Frames with a selected region
//! - `chroma_track_empty_masks_total` - Frames with no foreground pixel
//! - `chroma_track_inverted_ranges_total` - Frames thresholded with an inverted range
//!
//! ## Latest Frame
//! - `chroma_track_mask_coverage` - Foreground fraction of the mask
//! - `chroma_track_region_area` - Area of the selected region
//! - `chroma_track_frame_seconds` - Pipeline time
//!
//! With the `metrics` feature, [`MetricsServer`] serves them over HTTP.

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, ServerError};
