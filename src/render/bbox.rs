//! Axis-aligned bounding rectangles.

use imageproc::point::Point;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

/// Minimal axis-aligned rectangle around a set of pixel positions.
///
/// `width` and `height` count pixels, so a single point has size 1x1
/// and every point satisfies `x <= p.x < x + width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Computes the box enclosing `points`. Negative coordinates are
    /// clamped to zero. Returns `None` for an empty slice.
    pub fn enclosing(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        Some(Self {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x.max(min_x) - min_x) as u32 + 1,
            height: (max_y.max(min_y) - min_y) as u32 + 1,
        })
    }

    /// Returns true if `(px, py)` lies inside `[x, x + width] x [y, y + height]`.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (x, y) = (self.x as i64, self.y as i64);
        let (px, py) = (px as i64, py as i64);
        px >= x && py >= y && px <= x + self.width as i64 && py <= y + self.height as i64
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Rectangle for drawing, inset by `inset` pixels on every side.
    ///
    /// The outline runs from `(x, y)` to `(x + width, y + height)`, one
    /// pixel past the enclosed points. Returns `None` once the inset
    /// swallows the rectangle.
    pub(crate) fn outline(&self, inset: u32) -> Option<Rect> {
        let w = (self.width + 1).checked_sub(2 * inset)?;
        let h = (self.height + 1).checked_sub(2 * inset)?;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Rect::at((self.x + inset) as i32, (self.y + inset) as i32).of_size(w, h))
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_points() {
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_single_point() {
        let bbox = BoundingBox::enclosing(&[Point::new(3, 4)]).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                x: 3,
                y: 4,
                width: 1,
                height: 1
            }
        );
        assert_eq!(bbox.area(), 1);
    }

    #[test]
    fn test_outline_inset() {
        let bbox = BoundingBox {
            x: 2,
            y: 2,
            width: 4,
            height: 3,
        };
        let outer = bbox.outline(0).unwrap();
        assert_eq!((outer.left(), outer.top(), outer.width(), outer.height()), (2, 2, 5, 4));

        let inner = bbox.outline(1).unwrap();
        assert_eq!((inner.left(), inner.top(), inner.width(), inner.height()), (3, 3, 3, 2));

        assert!(bbox.outline(2).is_none());
    }

    proptest! {
        #[test]
        fn prop_box_contains_all_points(
            coords in prop::collection::vec((0i32..500, 0i32..500), 1..64)
        ) {
            let points: Vec<Point<i32>> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
            let bbox = BoundingBox::enclosing(&points).unwrap();

            prop_assert!(bbox.width >= 1 && bbox.height >= 1);
            for p in &points {
                prop_assert!(bbox.contains(p.x, p.y));
            }

            // Minimal: every edge touches a point
            prop_assert!(points.iter().any(|p| p.x as u32 == bbox.x));
            prop_assert!(points.iter().any(|p| p.y as u32 == bbox.y));
            prop_assert!(points.iter().any(|p| p.x as u32 == bbox.x + bbox.width - 1));
            prop_assert!(points.iter().any(|p| p.y as u32 == bbox.y + bbox.height - 1));
        }
    }
}
