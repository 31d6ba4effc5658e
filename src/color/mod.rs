//! Color spaces and threshold ranges.
//!
//! Frames are converted into a working color space, then classified
//! against an inclusive per-channel [`ColorRange`]. The range is either
//! a hand-tuned constant or derived from the frame itself.

mod provider;
mod range;
mod space;

pub use provider::RangeProvider;
pub use range::ColorRange;
pub use space::{bgr_to_hsv, convert, hsv_to_bgr, ColorSpace};
