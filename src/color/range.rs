//! Inclusive per-channel color ranges.

use super::ColorSpace;
use crate::capture::Pixel;
use serde::{Deserialize, Serialize};

/// An inclusive `[lower, upper]` box over the three channels.
///
/// `lower[c] <= upper[c]` is expected but not enforced: the adaptive
/// path can yield an inverted range, which matches no pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: Pixel,
    pub upper: Pixel,
}

impl ColorRange {
    /// Narrow hue band around blue in 8-bit HSV.
    pub const HSV_BLUE: ColorRange = ColorRange::new([110, 50, 50], [130, 255, 255]);

    /// Channel-wise band around a reference blue, used for the
    /// BGR and RGB spaces alike.
    pub const REFERENCE_BLUE: ColorRange = ColorRange::new([30, 80, 80], [60, 120, 190]);

    /// Seed values of the adaptive min/max scan. A cluster with no
    /// members leaves them untouched, giving an inverted range.
    pub const SENTINEL: ColorRange = ColorRange::new([180, 255, 255], [0, 0, 0]);

    pub const fn new(lower: Pixel, upper: Pixel) -> Self {
        Self { lower, upper }
    }

    /// Returns the hand-tuned range for `color_space`.
    pub fn fixed(color_space: ColorSpace) -> Self {
        match color_space {
            ColorSpace::Hsv => Self::HSV_BLUE,
            ColorSpace::Bgr | ColorSpace::Rgb => Self::REFERENCE_BLUE,
        }
    }

    /// Returns true if every channel of `pixel` lies within the range.
    #[inline]
    pub fn contains(&self, pixel: Pixel) -> bool {
        (0..3).all(|c| self.lower[c] <= pixel[c] && pixel[c] <= self.upper[c])
    }

    /// Returns true if any lower bound exceeds its upper bound.
    pub fn is_inverted(&self) -> bool {
        (0..3).any(|c| self.lower[c] > self.upper[c])
    }
}

impl std::fmt::Display for ColorRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.lower, self.upper)
    }
}
