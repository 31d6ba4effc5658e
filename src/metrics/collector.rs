//! Metrics collection and registry.

use crate::pipeline::FrameReport;
use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus metrics registry for the tracker.
///
/// Cloning shares the underlying metrics.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,

    // Counters
    frames_processed: IntCounter,
    regions_found: IntCounter,
    empty_masks: IntCounter,
    inverted_ranges: IntCounter,

    // Latest frame
    mask_coverage: Gauge,
    region_area: Gauge,
    frame_seconds: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all tracker metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_processed = IntCounter::new(
            "chroma_track_frames_processed_total",
            "Total number of frames run through the pipeline",
        )?;
        let regions_found = IntCounter::new(
            "chroma_track_regions_found_total",
            "Frames in which a region was selected",
        )?;
        let empty_masks = IntCounter::new(
            "chroma_track_empty_masks_total",
            "Frames whose mask had no foreground pixel",
        )?;
        let inverted_ranges = IntCounter::new(
            "chroma_track_inverted_ranges_total",
            "Frames thresholded with an inverted color range",
        )?;

        let mask_coverage = Gauge::new(
            "chroma_track_mask_coverage",
            "Foreground fraction of the latest mask",
        )?;
        let region_area = Gauge::new(
            "chroma_track_region_area",
            "Enclosed area of the latest selected region (0 if none)",
        )?;
        let frame_seconds = Gauge::new(
            "chroma_track_frame_seconds",
            "Pipeline time for the latest frame",
        )?;

        registry.register(Box::new(frames_processed.clone()))?;
        registry.register(Box::new(regions_found.clone()))?;
        registry.register(Box::new(empty_masks.clone()))?;
        registry.register(Box::new(inverted_ranges.clone()))?;
        registry.register(Box::new(mask_coverage.clone()))?;
        registry.register(Box::new(region_area.clone()))?;
        registry.register(Box::new(frame_seconds.clone()))?;

        Ok(Self {
            registry,
            frames_processed,
            regions_found,
            empty_masks,
            inverted_ranges,
            mask_coverage,
            region_area,
            frame_seconds,
        })
    }

    /// Records one frame's results.
    pub fn observe(&self, report: &FrameReport) {
        self.frames_processed.inc();

        if report.bounding_box.is_some() {
            self.regions_found.inc();
        }
        if report.mask_coverage == 0.0 {
            self.empty_masks.inc();
        }
        if report.range_inverted {
            self.inverted_ranges.inc();
        }

        self.mask_coverage.set(report.mask_coverage);
        self.region_area.set(report.region_area.unwrap_or(0.0));
        self.frame_seconds.set(report.elapsed.as_secs_f64());
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRange;
    use crate::render::BoundingBox;
    use std::time::Duration;

    fn report(found: bool) -> FrameReport {
        FrameReport {
            sequence: 1,
            range: ColorRange::HSV_BLUE,
            range_inverted: false,
            mask_coverage: if found { 0.25 } else { 0.0 },
            region_area: found.then_some(42.0),
            bounding_box: found.then_some(BoundingBox {
                x: 1,
                y: 2,
                width: 7,
                height: 8,
            }),
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_observe() {
        let registry = MetricsRegistry::new().unwrap();

        registry.observe(&report(true));
        registry.observe(&report(false));

        let output = registry.encode().unwrap();
        assert!(output.contains("chroma_track_frames_processed_total 2"));
        assert!(output.contains("chroma_track_regions_found_total 1"));
        assert!(output.contains("chroma_track_empty_masks_total 1"));
        assert!(output.contains("chroma_track_region_area 0"));
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("chroma_track_frames_processed_total"));
        assert!(output.contains("chroma_track_inverted_ranges_total"));
        assert!(output.contains("chroma_track_mask_coverage"));
    }
}
