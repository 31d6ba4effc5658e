//! Tracker and capture configuration.
//!
//! Everything is built once before the frame loop starts and passed
//! down by reference. Nothing here changes while frames are processed.

use crate::clustering::{DEFAULT_CLUSTER_COUNT, MAX_CLUSTER_COUNT};
use crate::color::ColorSpace;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-frame pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Working color space frames are converted to.
    pub color_space: ColorSpace,
    /// Derive the range from the dominant color cluster instead of
    /// using the fixed range for `color_space`.
    pub adaptive_clustering: bool,
    pub clustering: ClusteringConfig,
    pub overlay: OverlayConfig,
}

impl TrackerConfig {
    /// Creates a configuration with default clustering and overlay.
    pub fn new(color_space: ColorSpace, adaptive_clustering: bool) -> Self {
        Self {
            color_space,
            adaptive_clustering,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clustering.validate()?;
        if self.overlay.thickness == 0 {
            return Err(ConfigError::InvalidThickness);
        }
        Ok(())
    }
}

/// k-means parameters for the adaptive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Number of clusters per frame.
    pub clusters: usize,
    /// Upper bound on refinement iterations.
    pub max_iterations: usize,
    /// Stop once the summed centroid movement (channels scaled to
    /// `[0, 1]`) drops to this value.
    pub tolerance: f64,
    /// Seed for centroid initialisation.
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTER_COUNT,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 0,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clusters == 0 || self.clusters > MAX_CLUSTER_COUNT {
            return Err(ConfigError::InvalidClusterCount);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidIterations);
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Bounding box stroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Stroke color in the working color space's channel order.
    pub color: [u8; 3],
    /// Stroke thickness in pixels.
    pub thickness: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            thickness: 2,
        }
    }
}

/// Where frames come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Generated test frames.
    #[default]
    Synthetic,
    /// Image files read from a directory.
    Directory,
    /// Live camera (requires the `camera` feature).
    Camera,
}

/// Configuration for frame capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub source: SourceKind,
    /// Camera device index.
    pub device_id: u32,
    /// Frame width in pixels (synthetic and camera sources).
    pub width: u32,
    /// Frame height in pixels (synthetic and camera sources).
    pub height: u32,
    /// Number of frames the synthetic source yields.
    pub frame_count: u64,
    /// Directory read by the directory source.
    pub input_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            device_id: 0,
            width: 640,
            height: 480,
            frame_count: 100,
            input_dir: None,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.source == SourceKind::Directory && self.input_dir.is_none() {
            return Err(ConfigError::MissingInputDir);
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory annotated frames are written to. Frames are only
    /// logged when unset.
    pub output_dir: Option<PathBuf>,
    /// Stop after this many frames (0 runs until the source ends).
    pub frame_limit: u64,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
    /// Stream frames to a live viewer instead of writing or logging them.
    pub viewer: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            frame_limit: 0,
            metrics_port: 9090,
            viewer: false,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("cluster count must be between 1 and 255")]
    InvalidClusterCount,
    #[error("iteration limit must be at least 1")]
    InvalidIterations,
    #[error("invalid clustering tolerance {0}")]
    InvalidTolerance(f64),
    #[error("overlay thickness must be at least 1")]
    InvalidThickness,
    #[error("directory source needs an input directory")]
    MissingInputDir,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate()?;
        self.capture.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracker.color_space, ColorSpace::Bgr);
        assert!(!config.tracker.adaptive_clustering);
        assert_eq!(config.tracker.clustering.clusters, 10);
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_zero_clusters_invalid() {
        let mut config = TrackerConfig::default();
        config.clustering.clusters = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClusterCount)
        ));

        config.clustering.clusters = MAX_CLUSTER_COUNT + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClusterCount)
        ));
    }

    #[test]
    fn test_directory_source_needs_input() {
        let config = CaptureConfig {
            source: SourceKind::Directory,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingInputDir)
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config = FileConfig::from_toml(
            r#"
            [tracker]
            color_space = "native"
            adaptive_clustering = true

            [tracker.clustering]
            seed = 7

            [capture]
            source = "synthetic"
            width = 32
            height = 24

            [output]
            frame_limit = 5
            viewer = true
            "#,
        )
        .unwrap();

        assert_eq!(config.tracker.color_space, ColorSpace::Bgr);
        assert!(config.tracker.adaptive_clustering);
        assert_eq!(config.tracker.clustering.seed, 7);
        assert_eq!(config.tracker.clustering.clusters, 10);
        assert_eq!(config.capture.width, 32);
        assert_eq!(config.output.frame_limit, 5);
        assert!(config.output.viewer);
    }

    #[test]
    fn test_parse_color_space_aliases() {
        for (text, expected) in [
            ("hsv", ColorSpace::Hsv),
            ("rgb", ColorSpace::Rgb),
            ("alt-rgb", ColorSpace::Rgb),
            ("bgr", ColorSpace::Bgr),
        ] {
            let config =
                FileConfig::from_toml(&format!("[tracker]\ncolor_space = \"{text}\"")).unwrap();
            assert_eq!(config.tracker.color_space, expected);
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            FileConfig::from_toml("[tracker]\ncolor_space = \"cmyk\""),
            Err(ConfigError::ParseError(_))
        ));
    }
}
