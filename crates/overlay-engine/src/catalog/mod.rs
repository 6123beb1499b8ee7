//! Declarative contracts for overlay kinds
//!
//! Each kind declares how many points it captures, which axes of a capture
//! point are locked to an earlier anchor, and how the current points map to
//! render primitives. Kinds are registered in an [`OverlayCatalog`] value by
//! an explicit idempotent initializer; there is no ambient global state.

use std::collections::HashMap;

use chart_studies_shared::{
    ChartStudiesError, ChartStudiesResult, Overlay, OverlayKind, OverlayStyle, Point,
};

use crate::figure::Figure;

pub mod bracket;
pub mod fibonacci;
pub mod range;
pub mod rectangle;
pub mod rotated_rect;
pub mod segment;
pub mod text;
pub mod trend_line;

/// Number of capture points a kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Points append until an explicit finalize.
    Unbounded,
}

/// Axis constraint applied to a capture point while drawing or editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    None,
    /// X (and time index) follow the anchor point.
    XToAnchor { anchor: usize },
    /// Y (and price) follow the anchor point.
    YToAnchor { anchor: usize },
}

/// Declarative contract for one overlay kind.
///
/// `figures` must tolerate fewer points than the declared arity (the state
/// machine renders previews mid-capture) and emit whatever is derivable.
pub trait OverlayTemplate: Send + Sync {
    fn kind(&self) -> OverlayKind;

    fn arity(&self) -> Arity;

    /// Axis lock for the capture point at `index`.
    fn point_lock(&self, _index: usize) -> AxisLock {
        AxisLock::None
    }

    /// Map the current points to render primitives.
    fn figures(
        &self,
        points: &[Point],
        style: &OverlayStyle,
        extend_data: Option<&serde_json::Value>,
    ) -> Vec<Figure>;

    /// Whether commit must solicit text from the prompt collaborator.
    fn solicits_text(&self) -> bool {
        false
    }
}

/// Resolve `lock` against the anchor points, constraining `candidate`.
pub fn apply_lock(lock: AxisLock, candidate: Point, points: &[Point]) -> Point {
    match lock {
        AxisLock::None => candidate,
        AxisLock::XToAnchor { anchor } => match points.get(anchor) {
            Some(a) => Point {
                x: a.x,
                time_index: a.time_index,
                ..candidate
            },
            None => candidate,
        },
        AxisLock::YToAnchor { anchor } => match points.get(anchor) {
            Some(a) => Point {
                y: a.y,
                price: a.price,
                ..candidate
            },
            None => candidate,
        },
    }
}

/// Re-apply every declared lock so dependent points follow their anchor.
pub fn reproject_locks(template: &dyn OverlayTemplate, points: &mut Vec<Point>) {
    for i in 0..points.len() {
        let updated = apply_lock(template.point_lock(i), points[i], points);
        points[i] = updated;
    }
}

/// Registry of overlay templates.
pub struct OverlayCatalog {
    templates: HashMap<OverlayKind, Box<dyn OverlayTemplate>>,
    builtins_installed: bool,
}

impl OverlayCatalog {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            builtins_installed: false,
        }
    }

    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.install_builtins();
        catalog
    }

    /// Install the built-in kinds. Idempotent: a second call is a no-op.
    pub fn install_builtins(&mut self) {
        if self.builtins_installed {
            return;
        }
        self.register(Box::new(segment::SegmentTemplate));
        self.register(Box::new(rectangle::RectangleTemplate));
        self.register(Box::new(rotated_rect::RotatedRectangleTemplate));
        self.register(Box::new(trend_line::TrendLineTemplate));
        self.register(Box::new(fibonacci::FibonacciTemplate));
        self.register(Box::new(bracket::PositionTemplate::long()));
        self.register(Box::new(bracket::PositionTemplate::short()));
        self.register(Box::new(range::DatePriceRangeTemplate));
        self.register(Box::new(text::TextTemplate));
        self.builtins_installed = true;
    }

    /// Register a template, replacing any previous one for the same kind.
    pub fn register(&mut self, template: Box<dyn OverlayTemplate>) {
        self.templates.insert(template.kind(), template);
    }

    pub fn get(&self, kind: OverlayKind) -> Option<&dyn OverlayTemplate> {
        self.templates.get(&kind).map(|t| t.as_ref())
    }

    pub fn template(&self, kind: OverlayKind) -> ChartStudiesResult<&dyn OverlayTemplate> {
        self.get(kind).ok_or_else(|| ChartStudiesError::UnknownKind {
            kind: kind.to_string(),
        })
    }

    /// Figures for a committed overlay.
    pub fn overlay_figures(&self, overlay: &Overlay) -> Vec<Figure> {
        match self.get(overlay.kind) {
            Some(template) => template.figures(
                &overlay.points,
                &overlay.style,
                overlay.extend_data.as_ref(),
            ),
            None => Vec::new(),
        }
    }

    pub fn kinds(&self) -> Vec<OverlayKind> {
        self.templates.keys().copied().collect()
    }
}

impl Default for OverlayCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_builtins_is_idempotent() {
        let mut catalog = OverlayCatalog::new();
        catalog.install_builtins();
        let count = catalog.kinds().len();
        catalog.install_builtins();
        assert_eq!(catalog.kinds().len(), count);
        assert_eq!(count, 9);
    }

    #[test]
    fn test_unknown_kind_is_typed_error() {
        let catalog = OverlayCatalog::new();
        let err = catalog.template(OverlayKind::Segment).err().unwrap();
        assert!(matches!(err, ChartStudiesError::UnknownKind { .. }));
    }

    #[test]
    fn test_apply_lock_y_to_anchor() {
        let anchor = Point::new(5.0, 50.0, 1.0, 105.0);
        let candidate = Point::new(20.0, 80.0, 4.0, 92.0);
        let locked = apply_lock(AxisLock::YToAnchor { anchor: 0 }, candidate, &[anchor]);
        assert_eq!(locked.y, 50.0);
        assert_eq!(locked.price, 105.0);
        assert_eq!(locked.x, 20.0);
        assert_eq!(locked.time_index, 4.0);
    }

    #[test]
    fn test_apply_lock_missing_anchor_is_no_op() {
        let candidate = Point::new(20.0, 80.0, 4.0, 92.0);
        let locked = apply_lock(AxisLock::XToAnchor { anchor: 3 }, candidate, &[]);
        assert_eq!(locked, candidate);
    }
}
