//! Multi-point trend line with unbounded capture.
//!
//! Each click appends a point; the finalize action (handled by the drawing
//! state machine) discards the trailing preview point.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure};

pub struct TrendLineTemplate;

impl OverlayTemplate for TrendLineTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::TrendLine
    }

    fn arity(&self) -> Arity {
        Arity::Unbounded
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
        vec![Figure::line(
            points.iter().map(|p| Coord::new(p.x, p.y)).collect(),
        )]
    }
}
