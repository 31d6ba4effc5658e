//! The frame loop: acquire, process, present, poll, repeat.

use super::{CancellationSignal, DisplaySink, FrameReport, Pipeline};
use crate::capture::{CaptureError, FrameSource};
use crate::metrics::MetricsRegistry;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort the frame loop.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("frame source produced an unusable frame: {0}")]
    Source(#[source] CaptureError),
}

/// Loop lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The source had no more frames.
    SourceExhausted,
    /// A frame could not be acquired. There is no retry.
    SourceFailed(String),
    /// The cancellation signal fired.
    Cancelled,
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames_processed: u64,
    pub regions_found: u64,
    pub stop_reason: StopReason,
}

/// Drives frames through the pipeline one at a time, in lockstep.
pub struct FrameLoop<S, D, C> {
    pipeline: Pipeline,
    source: S,
    sink: D,
    signal: C,
    metrics: Option<MetricsRegistry>,
    state: LoopState,
    /// Set once, when the loop first stops.
    stop_reason: Option<StopReason>,
}

impl<S, D, C> FrameLoop<S, D, C>
where
    S: FrameSource,
    D: DisplaySink,
    C: CancellationSignal,
{
    pub fn new(pipeline: Pipeline, source: S, sink: D, signal: C) -> Self {
        Self {
            pipeline,
            source,
            sink,
            signal,
            metrics: None,
            state: LoopState::Running,
            stop_reason: None,
        }
    }

    /// Records every frame report into `registry`.
    pub fn with_metrics(mut self, registry: MetricsRegistry) -> Self {
        self.metrics = Some(registry);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Why the loop stopped, once it has.
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    /// Returns the display sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Runs until the source ends, fails, or the signal fires.
    ///
    /// A malformed frame is the only error; any other acquisition
    /// failure ends the loop normally. Calling `run` again after the
    /// loop has stopped processes nothing and reports the original
    /// stop reason.
    pub fn run(&mut self) -> Result<LoopSummary, LoopError> {
        let mut frames_processed = 0;
        let mut regions_found = 0;

        if let Some(reason) = &self.stop_reason {
            return Ok(LoopSummary {
                frames_processed,
                regions_found,
                stop_reason: reason.clone(),
            });
        }

        info!(
            color_space = %self.pipeline.config().color_space,
            adaptive = self.pipeline.config().adaptive_clustering,
            "Frame loop started"
        );

        let stop_reason = loop {
            let frame = match self.source.next_frame() {
                Ok(frame) => frame,
                Err(CaptureError::EndOfStream) => break StopReason::SourceExhausted,
                Err(e) if e.is_fatal() => {
                    self.state = LoopState::Stopped;
                    self.stop_reason = Some(StopReason::SourceFailed(e.to_string()));
                    return Err(LoopError::Source(e));
                }
                Err(e) => {
                    warn!("Frame acquisition failed: {}", e);
                    break StopReason::SourceFailed(e.to_string());
                }
            };

            let processed = self.pipeline.process(&frame);
            frames_processed += 1;
            if processed.report.bounding_box.is_some() {
                regions_found += 1;
            }
            self.record(&processed.report);

            self.sink.show(&processed.annotated);

            if self.signal.poll() {
                break StopReason::Cancelled;
            }
        };

        self.state = LoopState::Stopped;
        self.stop_reason = Some(stop_reason.clone());
        info!(
            frames = frames_processed,
            regions = regions_found,
            reason = ?stop_reason,
            "Frame loop stopped"
        );

        Ok(LoopSummary {
            frames_processed,
            regions_found,
            stop_reason,
        })
    }

    fn record(&self, report: &FrameReport) {
        if report.range_inverted {
            warn!(
                sequence = report.sequence,
                range = %report.range,
                "Inverted color range, mask will be empty"
            );
        }

        match report.bounding_box {
            Some(bbox) => debug!(
                sequence = report.sequence,
                bbox = %bbox,
                area = report.region_area,
                coverage = report.mask_coverage,
                elapsed_ms = report.elapsed.as_secs_f64() * 1e3,
                "Region found"
            ),
            None => debug!(
                sequence = report.sequence,
                elapsed_ms = report.elapsed.as_secs_f64() * 1e3,
                "No region"
            ),
        }

        if let Some(metrics) = &self.metrics {
            metrics.observe(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Frame, FrameError, FrameQueue, SyntheticSource, TrackerConfig};
    use crate::color::ColorSpace;
    use crate::pipeline::{FrameBudget, Never, RecordingSink};

    fn hsv_pipeline() -> Pipeline {
        Pipeline::new(TrackerConfig::new(ColorSpace::Hsv, false))
    }

    #[test]
    fn test_runs_until_source_exhausted() {
        let source = SyntheticSource::new(40, 40, 3);
        let mut frame_loop = FrameLoop::new(hsv_pipeline(), source, RecordingSink::new(), Never);
        assert_eq!(frame_loop.state(), LoopState::Running);

        let summary = frame_loop.run().unwrap();

        assert_eq!(summary.frames_processed, 3);
        assert_eq!(summary.regions_found, 3);
        assert_eq!(summary.stop_reason, StopReason::SourceExhausted);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.sink().frames().len(), 3);
    }

    #[test]
    fn test_cancellation_checked_after_present() {
        let source = SyntheticSource::new(40, 40, 10);
        let mut frame_loop =
            FrameLoop::new(hsv_pipeline(), source, RecordingSink::new(), FrameBudget::new(2));

        let summary = frame_loop.run().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
        assert_eq!(summary.frames_processed, 2);
        assert_eq!(frame_loop.sink().frames().len(), 2);
    }

    #[test]
    fn test_read_failure_stops_without_retry() {
        let mut queue = FrameQueue::new(vec![Frame::filled(4, 4, [0, 0, 0], ColorSpace::Bgr)]);
        queue.push_error(CaptureError::CaptureFailed("device lost".into()));
        queue.push_error(CaptureError::EndOfStream);

        let mut frame_loop = FrameLoop::new(hsv_pipeline(), queue, RecordingSink::new(), Never);
        let summary = frame_loop.run().unwrap();

        assert_eq!(summary.frames_processed, 1);
        assert_eq!(summary.regions_found, 0);
        assert!(matches!(summary.stop_reason, StopReason::SourceFailed(_)));
    }

    #[test]
    fn test_malformed_frame_is_fatal() {
        let mut queue = FrameQueue::default();
        queue.push_error(CaptureError::MalformedFrame(FrameError::BufferSizeMismatch {
            width: 2,
            height: 2,
            expected: 12,
            actual: 5,
        }));

        let mut frame_loop = FrameLoop::new(hsv_pipeline(), queue, RecordingSink::new(), Never);
        assert!(matches!(frame_loop.run(), Err(LoopError::Source(_))));
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let source = SyntheticSource::new(8, 8, 5);
        let mut frame_loop =
            FrameLoop::new(hsv_pipeline(), source, RecordingSink::new(), FrameBudget::new(1));

        frame_loop.run().unwrap();
        let again = frame_loop.run().unwrap();
        assert_eq!(again.frames_processed, 0);
        assert_eq!(frame_loop.sink().frames().len(), 1);
    }

    #[test]
    fn test_rerun_keeps_first_stop_reason() {
        let source = SyntheticSource::new(8, 8, 2);
        let mut frame_loop = FrameLoop::new(hsv_pipeline(), source, RecordingSink::new(), Never);
        assert_eq!(frame_loop.stop_reason(), None);

        let first = frame_loop.run().unwrap();
        assert_eq!(first.stop_reason, StopReason::SourceExhausted);

        let again = frame_loop.run().unwrap();
        assert_eq!(again.stop_reason, StopReason::SourceExhausted);
        assert_eq!(frame_loop.stop_reason(), Some(&StopReason::SourceExhausted));
    }

    #[test]
    fn test_rerun_after_fatal_error_reports_failure() {
        let mut queue = FrameQueue::default();
        queue.push_error(CaptureError::MalformedFrame(FrameError::BufferSizeMismatch {
            width: 1,
            height: 1,
            expected: 3,
            actual: 2,
        }));

        let mut frame_loop = FrameLoop::new(hsv_pipeline(), queue, RecordingSink::new(), Never);
        assert!(frame_loop.run().is_err());

        let again = frame_loop.run().unwrap();
        assert_eq!(again.frames_processed, 0);
        assert!(matches!(again.stop_reason, StopReason::SourceFailed(_)));
    }

    #[test]
    fn test_reports_reach_metrics() {
        let registry = MetricsRegistry::new().unwrap();
        let source = SyntheticSource::new(40, 40, 2);
        let mut frame_loop = FrameLoop::new(hsv_pipeline(), source, RecordingSink::new(), Never)
            .with_metrics(registry.clone());

        frame_loop.run().unwrap();

        let output = registry.encode().unwrap();
        assert!(output.contains("chroma_track_frames_processed_total 2"));
        assert!(output.contains("chroma_track_regions_found_total 2"));
    }
}
