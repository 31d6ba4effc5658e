//! Foreground segmentation.
//!
//! Turns a frame and a color range into a binary occupancy mask, then
//! traces the outer boundaries of the mask's connected regions.

mod contour;
mod mask;

pub use contour::{largest_region, polygon_area, Region};
pub use mask::{mask, Mask};
