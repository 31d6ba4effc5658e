//! Dominant-cluster color range.

use super::{ClusterAssignment, Clusterer, KMeans};
use crate::capture::{Frame, Pixel};
use crate::color::ColorRange;

/// Derives a color range from the most populous color cluster.
pub struct DominantColorClusterer {
    clusterer: Box<dyn Clusterer + Send + Sync>,
}

impl DominantColorClusterer {
    pub fn new(clusterer: impl Clusterer + Send + Sync + 'static) -> Self {
        Self {
            clusterer: Box::new(clusterer),
        }
    }

    /// Clusters `frame` and returns the tightest box around its
    /// dominant cluster.
    ///
    /// The frame must already be in the space the bounds are wanted in.
    /// Returns [`ColorRange::SENTINEL`] if clustering labelled nothing.
    pub fn cluster_bounds(&self, frame: &Frame) -> ColorRange {
        let pixels: Vec<Pixel> = frame.pixels().collect();
        let assignment = self.clusterer.cluster(&pixels);

        let Some(dominant) = assignment.dominant_label() else {
            tracing::debug!(
                sequence = frame.sequence(),
                "clustering produced no labels"
            );
            return ColorRange::SENTINEL;
        };

        let range = range_for_label(&pixels, &assignment, dominant);

        tracing::debug!(
            sequence = frame.sequence(),
            dominant,
            members = assignment.counts()[dominant],
            range = %range,
            "dominant cluster range"
        );

        range
    }
}

impl Default for DominantColorClusterer {
    fn default() -> Self {
        Self::new(KMeans::default())
    }
}

/// Exact per-channel min/max over the pixels labelled `label`.
///
/// Returns [`ColorRange::SENTINEL`] if no pixel carries `label`.
pub fn range_for_label(pixels: &[Pixel], assignment: &ClusterAssignment, label: usize) -> ColorRange {
    let mut members = pixels
        .iter()
        .zip(assignment.labels())
        .filter(|&(_, &l)| l == label)
        .map(|(pixel, _)| pixel);

    let Some(&first) = members.next() else {
        return ColorRange::SENTINEL;
    };

    members.fold(ColorRange::new(first, first), |mut range, pixel| {
        for c in 0..3 {
            range.lower[c] = range.lower[c].min(pixel[c]);
            range.upper[c] = range.upper[c].max(pixel[c]);
        }
        range
    })
}
