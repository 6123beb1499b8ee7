//! Shared types for the Chart Studies engine
//!
//! This crate contains the data model shared between the overlay annotation
//! engine and the candle aggregator: chart points, overlay reconstruction
//! data, pointer/overlay events, market data and error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod data_types;
pub mod errors;
pub mod events;

pub use data_types::{Candle, Tick, Timeframe};
pub use errors::{ChartStudiesError, ChartStudiesResult};

/// Unique identifier for an overlay.
///
/// Ids are assigned by the rendering surface when an overlay is first
/// created; the engine treats them as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(Uuid);

impl OverlayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A chart point in both coordinate spaces.
///
/// Projection math runs on the pixel coordinates; the domain coordinates
/// (time index, price) are what survives panning and zooming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub time_index: f64,
    pub price: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, time_index: f64, price: f64) -> Self {
        Self {
            x,
            y,
            time_index,
            price,
        }
    }
}

/// Overlay kinds known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    Segment,
    Rectangle,
    RotatedRectangle,
    TrendLine,
    FibonacciRetracement,
    LongPosition,
    ShortPosition,
    DatePriceRange,
    Text,
}

impl OverlayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Segment => "segment",
            OverlayKind::Rectangle => "rectangle",
            OverlayKind::RotatedRectangle => "rotatedRectangle",
            OverlayKind::TrendLine => "trendLine",
            OverlayKind::FibonacciRetracement => "fibonacciRetracement",
            OverlayKind::LongPosition => "longPosition",
            OverlayKind::ShortPosition => "shortPosition",
            OverlayKind::DatePriceRange => "datePriceRange",
            OverlayKind::Text => "text",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style applied to an overlay's figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub color: [f32; 4],
    pub fill_color: [f32; 4],
    pub line_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [0.0, 0.8, 0.8, 1.0],
            fill_color: [0.0, 0.8, 0.8, 0.15],
            line_width: 1.0,
        }
    }
}

/// A user-drawn geometric annotation.
///
/// `points` has exactly the arity its kind declares once committed.
/// `extend_data` carries kind-specific payload (the free-text content);
/// `group_id` allows bulk removal of related overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub points: Vec<Point>,
    pub style: OverlayStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_serialization() {
        let overlay = Overlay {
            id: OverlayId::new(),
            kind: OverlayKind::Segment,
            points: vec![
                Point::new(0.0, 0.0, 0.0, 100.0),
                Point::new(10.0, 5.0, 1.0, 105.0),
            ],
            style: OverlayStyle::default(),
            extend_data: None,
            group_id: Some("session-1".to_string()),
        };

        let serialized = bincode::serialize(&overlay).unwrap();
        let deserialized: Overlay = bincode::deserialize(&serialized).unwrap();

        assert_eq!(overlay, deserialized);
    }

    #[test]
    fn test_kind_round_trip_json() {
        let json = serde_json::to_string(&OverlayKind::FibonacciRetracement).unwrap();
        assert_eq!(json, "\"fibonacciRetracement\"");
        let back: OverlayKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OverlayKind::FibonacciRetracement);
    }
}
