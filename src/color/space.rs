//! Color space conversion.
//!
//! Frames arrive in the native B, G, R channel order. HSV uses the
//! 8-bit convention: hue is stored as degrees / 2 so it fits in
//! `[0, 180)`, saturation and value span `[0, 255]`.

use crate::capture::{Frame, Pixel};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Working color space of a frame.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Native channel order as produced by frame sources (B, G, R).
    #[default]
    #[serde(alias = "native")]
    #[value(alias = "native")]
    Bgr,
    /// Alternate order (R, G, B).
    #[serde(alias = "alt-rgb")]
    #[value(alias = "alt-rgb")]
    Rgb,
    /// Hue, saturation, value.
    Hsv,
}

impl std::fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColorSpace::Bgr => "bgr",
            ColorSpace::Rgb => "rgb",
            ColorSpace::Hsv => "hsv",
        };
        f.write_str(name)
    }
}

/// Converts a frame into `target`.
///
/// Returns a copy when the frame is already tagged with `target`.
pub fn convert(frame: &Frame, target: ColorSpace) -> Frame {
    if frame.color_space() == target {
        return frame.clone();
    }

    let image = map_pixels(frame.image(), |p| {
        let bgr = to_bgr(p, frame.color_space());
        from_bgr(bgr, target)
    });

    frame.with_image(image, target)
}

fn map_pixels(src: &RgbImage, f: impl Fn(Pixel) -> Pixel) -> RgbImage {
    let mut dst = RgbImage::new(src.width(), src.height());
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        *d = Rgb(f(s.0));
    }
    dst
}

fn to_bgr(p: Pixel, space: ColorSpace) -> Pixel {
    match space {
        ColorSpace::Bgr => p,
        ColorSpace::Rgb => [p[2], p[1], p[0]],
        ColorSpace::Hsv => hsv_to_bgr(p),
    }
}

fn from_bgr(p: Pixel, space: ColorSpace) -> Pixel {
    match space {
        ColorSpace::Bgr => p,
        ColorSpace::Rgb => [p[2], p[1], p[0]],
        ColorSpace::Hsv => bgr_to_hsv(p),
    }
}

/// Converts one B, G, R pixel to 8-bit H, S, V.
pub fn bgr_to_hsv([b, g, r]: Pixel) -> Pixel {
    let (b, g, r) = (b as f32, g as f32, r as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    let s = if max == 0.0 { 0.0 } else { 255.0 * delta / max };

    // 360 degrees wraps back to hue 0
    let h = (h / 2.0).round() as u32 % 180;
    [h as u8, s.round() as u8, max as u8]
}

/// Converts one 8-bit H, S, V pixel back to B, G, R.
pub fn hsv_to_bgr([h, s, v]: Pixel) -> Pixel {
    let h = (h as f32 * 2.0) % 360.0;
    let s = s as f32 / 255.0;
    let v = v as f32;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f32| (v + m).round().clamp(0.0, 255.0) as u8;
    [to_u8(b), to_u8(g), to_u8(r)]
}
