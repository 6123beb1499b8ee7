//! Fibonacci retracement between two price anchors.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure};
use crate::geometry;

/// Retracement ratios, in level order.
pub const RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// Price of a retracement level. Direction-aware: in an uptrend
/// (`value2 > value1`) levels are measured down from `value2`, otherwise up
/// from `value1`.
pub fn level_price(value1: f64, value2: f64, ratio: f64) -> f64 {
    let range = (value2 - value1).abs();
    if value2 > value1 {
        value2 - ratio * range
    } else {
        value1 + ratio * range
    }
}

/// Pixel y for a price, interpolated from the two anchors. The price range
/// denominator is clamped so two equal-price anchors stay finite.
fn pixel_y_for_price(p1: &Point, p2: &Point, price: f64) -> f64 {
    let dv = p2.price - p1.price;
    let denom = if dv.abs() < geometry::EPSILON {
        geometry::EPSILON.copysign(if dv == 0.0 { 1.0 } else { dv })
    } else {
        dv
    };
    p1.y + (price - p1.price) * (p2.y - p1.y) / denom
}

pub struct FibonacciTemplate;

impl OverlayTemplate for FibonacciTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::FibonacciRetracement
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
        let x_min = p1.x.min(p2.x);
        let x_max = p1.x.max(p2.x);

        let levels: Vec<(f64, f64)> = RATIOS
            .iter()
            .map(|&ratio| {
                let price = level_price(p1.price, p2.price, ratio);
                (ratio, pixel_y_for_price(p1, p2, price))
            })
            .collect();

        let mut figures = Vec::with_capacity(RATIOS.len() * 3 + RATIOS.len() - 1);
        for (i, &(ratio, y)) in levels.iter().enumerate() {
            let price = level_price(p1.price, p2.price, ratio);
            figures.push(Figure::line(vec![
                Coord::new(x_min, y),
                Coord::new(x_max, y),
            ]));
            figures.push(Figure::text(Coord::new(x_min, y), format!("{price:.2}")));
            figures.push(Figure::text(
                Coord::new(x_max, y),
                format!("{:.1}%", ratio * 100.0),
            ));
            // Shaded band to the next level.
            if let Some(&(_, next_y)) = levels.get(i + 1) {
                figures.push(Figure::polygon(vec![
                    Coord::new(x_min, y),
                    Coord::new(x_max, y),
                    Coord::new(x_max, next_y),
                    Coord::new(x_min, next_y),
                ]));
            }
        }
        figures
    }
}
