//! Per-frame pipeline and the loop that drives it.
//!
//! Each frame flows through the same stages, with nothing carried from
//! one frame to the next:
//!
//! ```text
//! convert → range → mask → largest region → overlay → display
//! ```

mod controller;
mod signal;
mod sink;

pub use controller::{FrameLoop, LoopError, LoopState, LoopSummary, StopReason};
pub use signal::{CancellationSignal, CtrlCSignal, FrameBudget, Never};
pub use sink::{DisplaySink, ImageDirectorySink, LogSink, RecordingSink};
#[cfg(feature = "viewer")]
pub use sink::RerunSink;

use crate::capture::{Frame, TrackerConfig};
use crate::clustering::{Clusterer, DominantColorClusterer, KMeans};
use crate::color::{convert, ColorRange, RangeProvider};
use crate::render::{BoundingBox, Overlay};
use crate::segmentation::{largest_region, mask, Mask};
use std::time::{Duration, Instant};

/// What the pipeline found in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub sequence: u64,
    /// Range the frame was thresholded with.
    pub range: ColorRange,
    /// Set when the range matches nothing because a lower bound
    /// exceeds its upper bound.
    pub range_inverted: bool,
    /// Fraction of foreground pixels in the mask.
    pub mask_coverage: f64,
    /// Area of the selected region, if any.
    pub region_area: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
    /// Time spent in the pipeline.
    pub elapsed: Duration,
}

/// Outputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    /// Working-space frame with the bounding box drawn on it.
    pub annotated: Frame,
    pub mask: Mask,
    pub report: FrameReport,
}

/// The stateless color-segmentation pipeline.
pub struct Pipeline {
    config: TrackerConfig,
    ranges: RangeProvider,
    overlay: Overlay,
}

impl Pipeline {
    /// Builds a pipeline using k-means for the adaptive range.
    pub fn new(config: TrackerConfig) -> Self {
        let kmeans = KMeans::from_config(&config.clustering);
        Self::with_clusterer(config, kmeans)
    }

    /// Builds a pipeline with a custom clusterer.
    pub fn with_clusterer(
        config: TrackerConfig,
        clusterer: impl Clusterer + Send + Sync + 'static,
    ) -> Self {
        Self {
            ranges: RangeProvider::new(DominantColorClusterer::new(clusterer)),
            overlay: Overlay::from_config(&config.overlay),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Runs every stage on `frame`.
    pub fn process(&self, frame: &Frame) -> ProcessedFrame {
        let started = Instant::now();
        let space = self.config.color_space;

        let working = convert(frame, space);
        let range = self
            .ranges
            .get_range(&working, space, self.config.adaptive_clustering);
        let mask = mask(&working, &range);
        let region = largest_region(&mask);
        let (annotated, bounding_box) = self.overlay.render(&working, region.as_ref());

        let report = FrameReport {
            sequence: frame.sequence(),
            range,
            range_inverted: range.is_inverted(),
            mask_coverage: mask.coverage(),
            region_area: region.as_ref().map(|r| r.area()),
            bounding_box,
            elapsed: started.elapsed(),
        };

        ProcessedFrame {
            annotated,
            mask,
            report,
        }
    }
}
