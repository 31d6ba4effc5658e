//! Binary occupancy masks.

use crate::capture::Frame;
use crate::color::ColorRange;
use image::{GrayImage, Luma};

/// Value stored for foreground pixels.
pub const FOREGROUND: u8 = 255;

/// One byte per pixel, `255` where the pixel's channels all lie in the
/// active range and `0` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns true if `(x, y)` is foreground.
    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y).0[0] == FOREGROUND
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.image.as_raw().iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Returns true if no pixel is foreground.
    pub fn is_empty(&self) -> bool {
        !self.image.as_raw().contains(&FOREGROUND)
    }

    /// Fraction of pixels that are foreground, `0.0` for an empty frame.
    pub fn coverage(&self) -> f64 {
        let total = self.image.as_raw().len();
        if total == 0 {
            return 0.0;
        }
        self.count() as f64 / total as f64
    }

    /// Returns the mask as a grayscale image.
    #[inline]
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }
}

impl From<GrayImage> for Mask {
    /// Any non-zero value is treated as foreground.
    fn from(image: GrayImage) -> Self {
        let mut image = image;
        for p in image.pixels_mut() {
            if p.0[0] != 0 {
                *p = Luma([FOREGROUND]);
            }
        }
        Self { image }
    }
}

/// Classifies every pixel of `frame` against `range`.
///
/// An inverted range matches nothing and yields an empty mask.
pub fn mask(frame: &Frame, range: &ColorRange) -> Mask {
    let mut image = GrayImage::new(frame.width(), frame.height());

    for (dst, src) in image.pixels_mut().zip(frame.pixels()) {
        if range.contains(src) {
            *dst = Luma([FOREGROUND]);
        }
    }

    Mask { image }
}
