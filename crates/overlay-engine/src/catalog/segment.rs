//! Straight segment between two free points.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure};

pub struct SegmentTemplate;

impl OverlayTemplate for SegmentTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Segment
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
        vec![Figure::line(vec![
            Coord::new(points[0].x, points[0].y),
            Coord::new(points[1].x, points[1].y),
        ])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_renders_one_line() {
        let figures = SegmentTemplate.figures(
            &[
                Point::new(0.0, 0.0, 0.0, 100.0),
                Point::new(10.0, 5.0, 2.0, 110.0),
            ],
            &OverlayStyle::default(),
            None,
        );
        assert_eq!(figures.len(), 1);
        assert!(matches!(&figures[0], Figure::Line { points } if points.len() == 2));
    }

    #[test]
    fn test_segment_with_one_point_renders_nothing() {
        let figures = SegmentTemplate.figures(
            &[Point::new(0.0, 0.0, 0.0, 100.0)],
            &OverlayStyle::default(),
            None,
        );
        assert!(figures.is_empty());
    }
}
