//! Bounding boxes and frame annotation.

mod bbox;
mod overlay;

pub use bbox::BoundingBox;
pub use overlay::Overlay;
