//! Frame type representing a captured image with metadata.

use crate::color::ColorSpace;
use chrono::{DateTime, Utc};
use image::{Rgb, RgbImage};
use thiserror::Error;

/// Number of interleaved channels in every frame.
pub const CHANNELS: usize = 3;

/// A single pixel as raw channel values, in the frame's channel order.
pub type Pixel = [u8; CHANNELS];

/// Errors raised when a frame buffer does not match its dimensions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("buffer holds {actual} bytes, expected {expected} for {width}x{height}x3")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A single frame from a source.
///
/// Holds interleaved 3-channel pixel data tagged with the color space
/// of its channels. The buffer length always equals
/// `width * height * 3`; this is checked on construction and the
/// fields are never exposed mutably in a way that could change it.
#[derive(Clone)]
pub struct Frame {
    /// Pixel data. `image::Rgb` is only the container, channel
    /// meaning is given by `color_space`.
    image: RgbImage,
    /// Color space of the channels.
    color_space: ColorSpace,
    /// Monotonic sequence number.
    sequence: u64,
    /// Capture timestamp.
    captured_at: DateTime<Utc>,
}

impl Frame {
    /// Creates a frame from a raw interleaved buffer.
    pub fn from_raw(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        sequence: u64,
    ) -> Result<Self, FrameError> {
        let expected = (width as usize) * (height as usize) * CHANNELS;
        if pixels.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        let image = RgbImage::from_raw(width, height, pixels).ok_or(
            FrameError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: 0,
            },
        )?;

        Ok(Self::from_image(image, color_space, sequence))
    }

    /// Wraps an existing image buffer.
    pub fn from_image(image: RgbImage, color_space: ColorSpace, sequence: u64) -> Self {
        Self {
            image,
            color_space,
            sequence,
            captured_at: Utc::now(),
        }
    }

    /// Creates a frame where every pixel has the same value.
    pub fn filled(width: u32, height: u32, pixel: Pixel, color_space: ColorSpace) -> Self {
        Self::from_image(RgbImage::from_pixel(width, height, Rgb(pixel)), color_space, 0)
    }

    /// Returns a copy of this frame's metadata around new pixel data.
    pub(crate) fn with_image(&self, image: RgbImage, color_space: ColorSpace) -> Self {
        Self {
            image,
            color_space,
            sequence: self.sequence,
            captured_at: self.captured_at,
        }
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.image.get_pixel(x, y).0
    }

    /// Iterates pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.image.pixels().map(|p| p.0)
    }

    /// Returns the raw interleaved buffer.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    #[inline]
    pub(crate) fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }
}

impl PartialEq for Frame {
    /// Frames compare by pixel content and color space only.
    fn eq(&self, other: &Self) -> bool {
        self.color_space == other.color_space && self.image == other.image
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color_space", &self.color_space)
            .field("sequence", &self.sequence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 64 * 48 * 3];
        let frame = Frame::from_raw(pixels, 64, 48, ColorSpace::Bgr, 1).unwrap();

        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.pixel_count(), 64 * 48);
        assert_eq!(frame.color_space(), ColorSpace::Bgr);
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let err = Frame::from_raw(pixels, 64, 48, ColorSpace::Bgr, 1).unwrap_err();

        assert_eq!(
            err,
            FrameError::BufferSizeMismatch {
                width: 64,
                height: 48,
                expected: 64 * 48 * 3,
                actual: 100,
            }
        );
    }

    #[test]
    fn test_pixels_row_major() {
        let data: Vec<u8> = (0..12).collect();
        let frame = Frame::from_raw(data, 2, 2, ColorSpace::Bgr, 0).unwrap();

        let pixels: Vec<Pixel> = frame.pixels().collect();
        assert_eq!(pixels, vec![[0, 1, 2], [3, 4, 5], [6, 7, 8], [9, 10, 11]]);
        assert_eq!(frame.pixel(1, 0), [3, 4, 5]);
        assert_eq!(frame.pixel(0, 1), [6, 7, 8]);
    }
}
