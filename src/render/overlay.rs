//! Drawing the selected region's bounding box onto a frame.

use super::BoundingBox;
use crate::capture::{Frame, OverlayConfig, Pixel};
use crate::segmentation::Region;
use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;

/// Draws bounding box outlines with a fixed stroke.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Stroke color, in the channel order of the annotated frame.
    color: Pixel,
    /// Stroke thickness in pixels, growing inwards.
    thickness: u32,
}

impl Overlay {
    pub fn new(color: Pixel, thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.color, config.thickness)
    }

    /// Returns a copy of `frame` with the bounding box of `region`
    /// outlined, and the box itself.
    ///
    /// With no region the copy is pixel-identical to `frame`.
    pub fn render(&self, frame: &Frame, region: Option<&Region>) -> (Frame, Option<BoundingBox>) {
        let mut annotated = frame.clone();
        let Some(region) = region else {
            return (annotated, None);
        };

        let bbox = region.bounding_box();
        self.draw(&mut annotated, &bbox);
        (annotated, Some(bbox))
    }

    /// Outlines `bbox` directly on `frame`.
    pub fn draw(&self, frame: &mut Frame, bbox: &BoundingBox) {
        for inset in 0..self.thickness {
            let Some(rect) = bbox.outline(inset) else {
                break;
            };
            draw_hollow_rect_mut(frame.image_mut(), rect, Rgb(self.color));
        }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}
