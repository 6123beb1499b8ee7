//! Render primitives derived from overlay points
//!
//! The engine never draws. Each overlay kind's render function maps its
//! current points to a list of these primitives, which the rendering
//! surface consumes.

use nalgebra_glm::DVec2;
use serde::{Deserialize, Serialize};

/// A pixel-space position inside a figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<DVec2> for Coord {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Semantic tone of a text label; the surface picks the actual color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTone {
    #[default]
    Neutral,
    Up,
    Down,
}

/// Primitive shapes a render function may emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Figure {
    /// Open polyline through `points`.
    Line { points: Vec<Coord> },
    /// Closed filled polygon.
    Polygon { points: Vec<Coord> },
    /// Axis-aligned rectangle.
    Rect { min: Coord, max: Coord },
    /// Text anchored at a pixel position.
    Text {
        at: Coord,
        content: String,
        tone: LabelTone,
    },
}

impl Figure {
    pub fn line(points: Vec<Coord>) -> Self {
        Figure::Line { points }
    }

    pub fn polygon(points: Vec<Coord>) -> Self {
        Figure::Polygon { points }
    }

    /// Axis-aligned rectangle from two opposite corners, normalized to
    /// bounding extents.
    pub fn rect(a: Coord, b: Coord) -> Self {
        Figure::Rect {
            min: Coord::new(a.x.min(b.x), a.y.min(b.y)),
            max: Coord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn text(at: Coord, content: impl Into<String>) -> Self {
        Figure::Text {
            at,
            content: content.into(),
            tone: LabelTone::Neutral,
        }
    }

    pub fn text_toned(at: Coord, content: impl Into<String>, tone: LabelTone) -> Self {
        Figure::Text {
            at,
            content: content.into(),
            tone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let fig = Figure::rect(Coord::new(10.0, 2.0), Coord::new(3.0, 8.0));
        match fig {
            Figure::Rect { min, max } => {
                assert_eq!(min, Coord::new(3.0, 2.0));
                assert_eq!(max, Coord::new(10.0, 8.0));
            }
            other => panic!("expected rect, got {other:?}"),
        }
    }

    #[test]
    fn test_figure_json_tagging() {
        let fig = Figure::text(Coord::new(1.0, 2.0), "hello");
        let json = serde_json::to_string(&fig).unwrap();
        assert!(json.contains("\"type\":\"text\""));
    }
}
