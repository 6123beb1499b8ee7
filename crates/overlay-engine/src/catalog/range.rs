//! Date/price range measurement box.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure, LabelTone};
use crate::geometry;

/// Measurement summary for the label: signed price delta, percentage delta
/// and elapsed bar count.
pub fn range_label(p1: &Point, p2: &Point) -> (String, LabelTone) {
    let delta = p2.price - p1.price;
    let pct = 100.0 * delta / p1.price.abs().max(geometry::EPSILON);
    let bars = (p2.time_index - p1.time_index).abs().round() as u64;
    let tone = if delta >= 0.0 {
        LabelTone::Up
    } else {
        LabelTone::Down
    };
    (format!("{delta:+.2} ({pct:+.2}%) {bars} bars"), tone)
}

pub struct DatePriceRangeTemplate;

impl OverlayTemplate for DatePriceRangeTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::DatePriceRange
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
        let (p1, p2) = (&points[0], &points[1]);
        let (label, tone) = range_label(p1, p2);
        vec![
            Figure::rect(Coord::new(p1.x, p1.y), Coord::new(p2.x, p2.y)),
            Figure::text_toned(
                Coord::new(p1.x.max(p2.x), p1.y.min(p2.y)),
                label,
                tone,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_up_move() {
        let p1 = Point::new(0.0, 50.0, 10.0, 100.0);
        let p2 = Point::new(40.0, 10.0, 25.0, 112.5);
        let (label, tone) = range_label(&p1, &p2);
        assert_eq!(label, "+12.50 (+12.50%) 15 bars");
        assert_eq!(tone, LabelTone::Up);
    }

    #[test]
    fn test_label_down_move_tone() {
        let p1 = Point::new(0.0, 10.0, 30.0, 120.0);
        let p2 = Point::new(40.0, 50.0, 10.0, 90.0);
        let (label, tone) = range_label(&p1, &p2);
        assert!(label.starts_with("-30.00"));
        assert!(label.ends_with("20 bars"));
        assert_eq!(tone, LabelTone::Down);
    }
}
