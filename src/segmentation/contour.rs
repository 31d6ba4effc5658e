//! Outer contours and region selection.

use super::Mask;
use crate::render::BoundingBox;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// The outer boundary of one connected foreground component.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    points: Vec<Point<i32>>,
    area: f64,
    bounds: BoundingBox,
}

impl Region {
    /// Builds a region from its boundary points. Returns `None` for an
    /// empty boundary.
    pub fn new(points: Vec<Point<i32>>) -> Option<Self> {
        let bounds = BoundingBox::enclosing(&points)?;
        let area = polygon_area(&points);
        Some(Self {
            points,
            area,
            bounds,
        })
    }

    /// Boundary points in tracing order.
    #[inline]
    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Area enclosed by the boundary polygon.
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }
}

/// Area of the polygon through `points`, by the shoelace formula.
///
/// Degenerate outlines (a single pixel, a one-pixel-wide line) have
/// zero area.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    twice.abs() as f64 / 2.0
}

/// Returns the outer region with the largest enclosed area.
///
/// Only outermost boundaries are considered; holes and anything nested
/// inside them are ignored. Ties go to the region traced first, which
/// follows a row-major scan of the mask. Returns `None` when the mask has
/// no foreground.
pub fn largest_region(mask: &Mask) -> Option<Region> {
    if mask.is_empty() {
        return None;
    }

    let contours = find_contours::<i32>(&padded(mask.as_image()));
    let mut best: Option<Region> = None;
    let mut outer = 0usize;

    for contour in contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
    {
        outer += 1;
        let points = contour
            .points
            .into_iter()
            .map(|p| Point::new(p.x - 1, p.y - 1))
            .collect();
        let Some(region) = Region::new(points) else {
            continue;
        };
        match &best {
            Some(b) if region.area <= b.area => {}
            _ => best = Some(region),
        }
    }

    tracing::trace!(
        regions = outer,
        area = best.as_ref().map(Region::area),
        "contour extraction"
    );

    best
}

/// Copies `image` into a one-pixel zero border, so regions touching
/// the frame edge are traced like any other. Points come back shifted
/// by one.
fn padded(image: &GrayImage) -> GrayImage {
    let mut out = GrayImage::new(image.width() + 2, image.height() + 2);
    for (x, y, p) in image.enumerate_pixels() {
        out.put_pixel(x + 1, y + 1, *p);
    }
    out
}
