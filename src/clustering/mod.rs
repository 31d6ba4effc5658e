//! Color clustering and dominant-range derivation.
//!
//! A [`Clusterer`] partitions a flat pixel list into labelled groups.
//! [`DominantColorClusterer`] picks the most populous group and
//! returns the tightest per-channel box around its members.

mod dominant;
mod kmeans;

pub use dominant::{range_for_label, DominantColorClusterer};
pub use kmeans::{KMeans, MAX_CLUSTER_COUNT};

use crate::capture::Pixel;

/// Default number of clusters per frame.
pub const DEFAULT_CLUSTER_COUNT: usize = 10;

/// Partitions pixels into color clusters.
///
/// Implementations must be deterministic for a given input and keep no
/// state between calls.
pub trait Clusterer {
    /// Assigns one label in `0..k` to every pixel, in input order.
    fn cluster(&self, pixels: &[Pixel]) -> ClusterAssignment;
}

/// Per-pixel cluster labels for a flattened pixel list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    k: usize,
}

impl ClusterAssignment {
    /// Creates an assignment.
    ///
    /// # Panics
    ///
    /// Panics if any label is not below `k`. A [`Clusterer`] that emits
    /// such a label is broken, and the counts built from it would index
    /// out of bounds anyway.
    pub fn new(labels: Vec<usize>, k: usize) -> Self {
        if let Some(&label) = labels.iter().find(|&&l| l >= k) {
            panic!("cluster label {label} out of range for k = {k}");
        }
        Self { labels, k }
    }

    #[inline]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Returns the cluster count.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Member count per label.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.k];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }

    /// Returns the most frequent label.
    ///
    /// Ties go to the label whose first occurrence comes earliest in
    /// pixel order. Returns `None` when no pixel was labelled.
    pub fn dominant_label(&self) -> Option<usize> {
        let counts = self.counts();
        let mut seen = vec![false; self.k];
        let mut best: Option<usize> = None;

        for &label in &self.labels {
            if std::mem::replace(&mut seen[label], true) {
                continue;
            }
            match best {
                Some(b) if counts[label] <= counts[b] => {}
                _ => best = Some(label),
            }
        }

        best
    }
}
