//! Axis-aligned rectangle from two opposite corners.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure};

pub struct RectangleTemplate;

impl OverlayTemplate for RectangleTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Rectangle
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(2)
    }

    fn figures(
        &self,
        points: &[Point],
        _style: &OverlayStyle,
        _extend_data: Option<&serde_json::Value>,
    ) -> Vec<Figure> {
        if points.len() < 2 {
            return Vec::new();
        }
        vec![Figure::rect(
            Coord::new(points[0].x, points[0].y),
            Coord::new(points[1].x, points[1].y),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_uses_bounding_extents() {
        let figures = RectangleTemplate.figures(
            &[
                Point::new(10.0, 2.0, 1.0, 102.0),
                Point::new(3.0, 8.0, 0.0, 108.0),
            ],
            &OverlayStyle::default(),
            None,
        );
        match &figures[0] {
            Figure::Rect { min, max } => {
                assert_eq!(*min, Coord::new(3.0, 2.0));
                assert_eq!(*max, Coord::new(10.0, 8.0));
            }
            other => panic!("expected rect, got {other:?}"),
        }
    }
}
