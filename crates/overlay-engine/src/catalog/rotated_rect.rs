//! Rotated rectangle captured as base-start, base-end and a height point.
//!
//! The third capture point is not a corner: its perpendicular projection
//! onto the base's normal gives the signed height, and the four corners are
//! derived from base and height. A rotation handle is synthesized outward
//! from the base-edge midpoint for editing; it is never a captured point.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};
use nalgebra_glm as glm;
use nalgebra_glm::DVec2;

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure};
use crate::geometry;

/// Pixel distance of the rotation handle from the base-edge midpoint.
pub const ROTATION_HANDLE_OFFSET: f64 = 24.0;

/// Derive the four corners from captured points, or `None` while the
/// height point has not been captured yet.
///
/// Corners are ordered c1 = base-start, c2 = base-end, c3 = c2 + n·h,
/// c4 = c1 + n·h.
pub fn corners(points: &[Point]) -> Option<[DVec2; 4]> {
    if points.len() < 3 {
        return None;
    }
    let c1 = geometry::vec(&points[0]);
    let c2 = geometry::vec(&points[1]);
    let height_point = geometry::vec(&points[2]);
    let normal = geometry::perpendicular(geometry::normalize(c2 - c1));
    let h = glm::dot(&(height_point - c1), &normal);
    Some([c1, c2, c2 + normal * h, c1 + normal * h])
}

/// Signed height encoded by the captured points.
pub fn signed_height(points: &[Point]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    Some(geometry::signed_height(
        geometry::vec(&points[2]),
        geometry::vec(&points[0]),
        geometry::vec(&points[1]),
    ))
}

/// Synthesized rotation handle, offset outward from the base-edge midpoint
/// (away from the rectangle body).
pub fn rotation_handle(corners: &[DVec2; 4]) -> DVec2 {
    let mid = geometry::midpoint(corners[0], corners[1]);
    let normal = geometry::perpendicular(geometry::normalize(corners[1] - corners[0]));
    let h = glm::dot(&(corners[3] - corners[0]), &normal);
    mid - normal * h.signum() * ROTATION_HANDLE_OFFSET
}

/// Center of the rectangle (intersection of the diagonals).
pub fn center(corners: &[DVec2; 4]) -> DVec2 {
    geometry::midpoint(corners[0], corners[2])
}

pub struct RotatedRectangleTemplate;

impl OverlayTemplate for RotatedRectangleTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::RotatedRectangle
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(3)
    }

    fn figures(
        &self,
        points: &[Point],
        _style: &OverlayStyle,
        _extend_data: Option<&serde_json::Value>,
    ) -> Vec<Figure> {
        match corners(points) {
            Some(c) => vec![Figure::polygon(c.iter().map(|v| Coord::from(*v)).collect())],
            // Base edge preview while the height point is pending.
            None if points.len() == 2 => vec![Figure::line(vec![
                Coord::new(points[0].x, points[0].y),
                Coord::new(points[1].x, points[1].y),
            ])],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y, x, y)
    }

    fn assert_corner(actual: DVec2, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn test_corner_derivation_from_height_projection() {
        // Height point (5, 4) projects to height 4 over the base.
        let c = corners(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 4.0)]).unwrap();
        assert_corner(c[0], 0.0, 0.0);
        assert_corner(c[1], 10.0, 0.0);
        assert_corner(c[2], 10.0, 4.0);
        assert_corner(c[3], 0.0, 4.0);
    }

    #[test]
    fn test_height_uses_projection_not_raw_click() {
        // Same projection regardless of where along the base the click lands.
        let a = corners(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(1.0, 4.0)]).unwrap();
        let b = corners(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(9.0, 4.0)]).unwrap();
        assert_corner(a[2], 10.0, 4.0);
        assert_corner(b[2], 10.0, 4.0);
    }

    #[test]
    fn test_signed_height_negative_below_base() {
        let h = signed_height(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, -3.0)]).unwrap();
        assert!((h + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_handle_outside_body() {
        let c = corners(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 4.0)]).unwrap();
        let handle = rotation_handle(&c);
        assert_corner(handle, 5.0, -ROTATION_HANDLE_OFFSET);
    }
}
