//! Free text annotation.
//!
//! Geometry commits immediately on the single capture point; the content is
//! solicited asynchronously from the text-prompt collaborator afterwards and
//! stored in `extend_data`.

use chart_studies_shared::{OverlayKind, OverlayStyle, Point};

use super::{Arity, OverlayTemplate};
use crate::figure::{Coord, Figure};

/// Content shown until the prompt resolves, and kept if it is cancelled.
pub const DEFAULT_TEXT_PLACEHOLDER: &str = "Text";

/// Resolve the displayed content from `extend_data`.
pub fn text_content(extend_data: Option<&serde_json::Value>) -> &str {
    extend_data
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_TEXT_PLACEHOLDER)
}

pub struct TextTemplate;

impl OverlayTemplate for TextTemplate {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Text
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(1)
    }

    fn figures(
        &self,
        points: &[Point],
        _style: &OverlayStyle,
        extend_data: Option<&serde_json::Value>,
    ) -> Vec<Figure> {
        let Some(p) = points.first() else {
            return Vec::new();
        };
        vec![Figure::text(
            Coord::new(p.x, p.y),
            text_content(extend_data),
        )]
    }

    fn solicits_text(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_without_extend_data() {
        let figures = TextTemplate.figures(
            &[Point::new(5.0, 5.0, 1.0, 101.0)],
            &OverlayStyle::default(),
            None,
        );
        assert!(matches!(
            &figures[0],
            Figure::Text { content, .. } if content == DEFAULT_TEXT_PLACEHOLDER
        ));
    }

    #[test]
    fn test_content_from_extend_data() {
        let data = serde_json::Value::String("breakout".to_string());
        let figures = TextTemplate.figures(
            &[Point::new(5.0, 5.0, 1.0, 101.0)],
            &OverlayStyle::default(),
            Some(&data),
        );
        assert!(matches!(
            &figures[0],
            Figure::Text { content, .. } if content == "breakout"
        ));
    }
}
