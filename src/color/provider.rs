//! Threshold range selection.

use super::{ColorRange, ColorSpace};
use crate::capture::Frame;
use crate::clustering::DominantColorClusterer;

/// Supplies the active color range for a frame.
///
/// Fixed ranges are keyed by color space. The adaptive path ignores
/// them and derives a range from the frame's dominant color cluster.
pub struct RangeProvider {
    dominant: DominantColorClusterer,
}

impl RangeProvider {
    pub fn new(dominant: DominantColorClusterer) -> Self {
        Self { dominant }
    }

    /// Returns the range to threshold `frame` with.
    ///
    /// `frame` must already be converted to `color_space`.
    pub fn get_range(&self, frame: &Frame, color_space: ColorSpace, adaptive: bool) -> ColorRange {
        if adaptive {
            self.dominant.cluster_bounds(frame)
        } else {
            ColorRange::fixed(color_space)
        }
    }
}

impl Default for RangeProvider {
    fn default() -> Self {
        Self::new(DominantColorClusterer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_path_ignores_frame() {
        let provider = RangeProvider::default();
        let frame = Frame::filled(4, 4, [1, 2, 3], ColorSpace::Hsv);

        assert_eq!(
            provider.get_range(&frame, ColorSpace::Hsv, false),
            ColorRange::HSV_BLUE
        );
        assert_eq!(
            provider.get_range(&frame, ColorSpace::Bgr, false),
            ColorRange::REFERENCE_BLUE
        );
    }

    #[test]
    fn test_adaptive_path_uses_frame_colors() {
        let provider = RangeProvider::default();
        let frame = Frame::filled(6, 5, [12, 34, 56], ColorSpace::Bgr);

        let range = provider.get_range(&frame, ColorSpace::Bgr, true);
        assert_eq!(range, ColorRange::new([12, 34, 56], [12, 34, 56]));
    }
}
