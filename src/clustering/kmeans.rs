//! k-means over raw channel values, backed by `kmeans_colors`.
//!
//! Pixels are handed to [`kmeans_colors::get_kmeans`] as three-float
//! points. Channels are only scaled into `[0, 1]` (the same factor on
//! every axis), so distances keep the proportions of the raw 8-bit
//! values whatever color space the frame is in. Seeding is k-means++
//! keyed by a fixed seed; nothing is carried over between calls.

use super::{ClusterAssignment, Clusterer, DEFAULT_CLUSTER_COUNT};
use crate::capture::{ClusteringConfig, Pixel};
use kmeans_colors::get_kmeans;
use palette::Srgb;

/// Largest cluster count `kmeans_colors` can label (indices are `u8`).
pub const MAX_CLUSTER_COUNT: usize = u8::MAX as usize;

/// Centroid-based clusterer.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters.
    k: usize,
    /// Upper bound on refinement iterations.
    max_iterations: usize,
    /// Stop once the summed centroid movement drops to this value.
    tolerance: f32,
    /// Seed for centroid initialisation.
    seed: u64,
}

impl KMeans {
    /// Creates a clusterer with `k` clusters, clamped to
    /// `1..=MAX_CLUSTER_COUNT`.
    pub fn new(k: usize) -> Self {
        Self {
            k: k.clamp(1, MAX_CLUSTER_COUNT),
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 0,
        }
    }

    /// Builds a clusterer from configuration.
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.clusters)
            .with_max_iterations(config.max_iterations)
            .with_tolerance(config.tolerance)
            .with_seed(config.seed)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0) as f32;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the cluster count.
    pub fn k(&self) -> usize {
        self.k
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_COUNT)
    }
}

/// Channel order is irrelevant here; `Srgb` is only a float triple.
#[inline]
fn to_point(pixel: &Pixel) -> Srgb {
    Srgb::new(
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    )
}

impl Clusterer for KMeans {
    fn cluster(&self, pixels: &[Pixel]) -> ClusterAssignment {
        if pixels.is_empty() {
            return ClusterAssignment::new(Vec::new(), self.k);
        }

        let points: Vec<Srgb> = pixels.iter().map(to_point).collect();
        let result = get_kmeans(
            self.k,
            self.max_iterations,
            self.tolerance,
            false,
            &points,
            self.seed,
        );

        tracing::trace!(
            k = self.k,
            pixels = points.len(),
            score = result.score,
            "k-means finished"
        );

        let labels = result.indices.iter().map(|&i| i as usize).collect();
        ClusterAssignment::new(labels, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patches(colors: &[(Pixel, usize)]) -> Vec<Pixel> {
        colors
            .iter()
            .flat_map(|&(color, count)| std::iter::repeat(color).take(count))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let assignment = KMeans::default().cluster(&[]);
        assert!(assignment.is_empty());
        assert_eq!(assignment.k(), DEFAULT_CLUSTER_COUNT);
    }

    #[test]
    fn test_separates_distinct_colors() {
        let pixels = patches(&[([0, 0, 0], 5), ([200, 200, 200], 7), ([0, 0, 250], 3)]);
        let assignment = KMeans::new(3).with_seed(7).cluster(&pixels);
        let labels = assignment.labels();

        // Same color, same label; different colors, different labels
        assert!(labels[..5].iter().all(|&l| l == labels[0]));
        assert!(labels[5..12].iter().all(|&l| l == labels[5]));
        assert!(labels[12..].iter().all(|&l| l == labels[12]));
        assert_ne!(labels[0], labels[5]);
        assert_ne!(labels[5], labels[12]);
        assert_ne!(labels[0], labels[12]);

        assert_eq!(assignment.dominant_label(), Some(labels[5]));
    }

    #[test]
    fn test_more_clusters_than_colors() {
        let pixels = patches(&[([10, 20, 30], 4), ([40, 50, 60], 2)]);
        let assignment = KMeans::new(10).cluster(&pixels);

        assert_eq!(assignment.labels().len(), 6);
        assert_eq!(assignment.counts().iter().sum::<usize>(), 6);
        assert_eq!(assignment.dominant_label(), Some(assignment.labels()[0]));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let pixels: Vec<Pixel> = (0..200u32)
            .map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8])
            .collect();

        let kmeans = KMeans::default().with_seed(42);
        assert_eq!(kmeans.cluster(&pixels), kmeans.cluster(&pixels));
    }

    #[test]
    fn test_cluster_count_is_clamped() {
        assert_eq!(KMeans::new(0).k(), 1);
        assert_eq!(KMeans::new(1000).k(), MAX_CLUSTER_COUNT);

        let assignment = KMeans::new(0).cluster(&[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(assignment.labels(), &[0, 0]);
    }

    #[test]
    fn test_from_config() {
        let config = ClusteringConfig {
            clusters: 4,
            max_iterations: 12,
            tolerance: 0.5,
            seed: 9,
        };
        let kmeans = KMeans::from_config(&config);
        assert_eq!(kmeans.k(), 4);
        assert_eq!(kmeans.max_iterations, 12);
        assert_eq!(kmeans.tolerance, 0.5);
        assert_eq!(kmeans.seed, 9);
    }
}
