//! Long/short position brackets.
//!
//! Four capture points: entry-left, entry-right (price locked to the entry),
//! stop and target (time index locked to the entry). Renders the entry line
//! across the bracket width, shaded stop/target bands and a risk:reward
//! label.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, AxisLock, OverlayTemplate};
use crate::figure::{Coord, Figure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSide {
    Long,
    Short,
}

/// Risk:reward label. Risk is entry-to-stop, reward entry-to-target; the
/// ratio collapses to "1:0.00" when the stop sits on the entry.
pub fn risk_reward_label(entry: f64, stop: f64, target: f64, side: PositionSide) -> String {
    let risk = (entry - stop).abs();
    let reward = match side {
        PositionSide::Long => (target - entry).abs(),
        PositionSide::Short => (entry - target).abs(),
    };
    let ratio = if risk == 0.0 { 0.0 } else { reward / risk };
    format!("1:{ratio:.2}")
}

pub struct PositionTemplate {
    side: PositionSide,
}

impl PositionTemplate {
    pub fn long() -> Self {
        Self {
            side: PositionSide::Long,
        }
    }

    pub fn short() -> Self {
        Self {
            side: PositionSide::Short,
        }
    }
}

impl OverlayTemplate for PositionTemplate {
    fn kind(&self) -> OverlayKind {
        match self.side {
            PositionSide::Long => OverlayKind::LongPosition,
            PositionSide::Short => OverlayKind::ShortPosition,
        }
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(4)
    }

    fn point_lock(&self, index: usize) -> AxisLock {
        match index {
            // Entry-right stays on the entry price, free in time.
            1 => AxisLock::YToAnchor { anchor: 0 },
            // Stop and target stay on the entry's time index, free in price.
            2 | 3 => AxisLock::XToAnchor { anchor: 0 },
            _ => AxisLock::None,
        }
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
        let entry_left = &points[0];
        let entry_right = &points[1];
        let x_min = entry_left.x.min(entry_right.x);
        let x_max = entry_left.x.max(entry_right.x);
        let entry_y = entry_left.y;

        let mut figures = vec![Figure::line(vec![
            Coord::new(x_min, entry_y),
            Coord::new(x_max, entry_y),
        ])];

        if let Some(stop) = points.get(2) {
            figures.push(Figure::rect(
                Coord::new(x_min, entry_y),
                Coord::new(x_max, stop.y),
            ));
        }
        if let Some(target) = points.get(3) {
            figures.push(Figure::rect(
                Coord::new(x_min, entry_y),
                Coord::new(x_max, target.y),
            ));
            let stop = &points[2];
            figures.push(Figure::text(
                Coord::new(x_max, entry_y),
                risk_reward_label(entry_left.price, stop.price, target.price, self.side),
            ));
        }
        figures
    }
}
