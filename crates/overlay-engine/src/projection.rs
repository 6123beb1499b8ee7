//! Edit engine: re-derives dependent points during drags
//!
//! Transient drag state (pointer origin, a copy of the original points, the
//! rotated-rectangle corner cache) lives in a side table keyed by overlay
//! id and is cleared on drag end. Overlays themselves carry no edit state.

use std::collections::HashMap;

use chart_studies_shared::{Overlay, OverlayId, OverlayKind, Point};
use nalgebra_glm as glm;
use nalgebra_glm::DVec2;

use crate::catalog::{self, rotated_rect, OverlayTemplate};
use crate::geometry;

/// Pixel radius for grabbing a control point.
pub const HANDLE_HIT_RADIUS: f64 = 8.0;
/// Pixel radius for grabbing the synthesized rotation handle.
pub const ROTATION_HANDLE_HIT_RADIUS: f64 = 12.0;
/// Pixel expansion of the body hit box.
pub const BODY_HIT_TOLERANCE: f64 = 8.0;

/// What a drag starting at a given position grabs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleHit {
    /// A control point; for rotated rectangles the index names a corner.
    Point(usize),
    Rotation,
    Body,
    Miss,
}

/// What changed after one drag step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// A single control point moved.
    Point { index: usize },
    /// Every point moved together (translate or rotation).
    Shape { delta: DVec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    Point(usize),
    Rotation,
    Body,
}

#[derive(Debug, Clone)]
struct DragCapture {
    mode: DragMode,
    origin: DVec2,
    original_points: Vec<Point>,
    /// Corner cache for rotated rectangles, valid for the drag's duration.
    corners: Option<[DVec2; 4]>,
}

fn set_pixel(point: &mut Point, v: DVec2) {
    point.x = v.x;
    point.y = v.y;
}

fn point_from_pixel(v: DVec2) -> Point {
    // Domain coordinates are re-derived by the caller via the surface
    // transform after the drag step.
    Point::new(v.x, v.y, 0.0, 0.0)
}

/// Handle positions used for hit testing: derived corners for rotated
/// rectangles, the captured points otherwise.
fn handle_positions(overlay: &Overlay) -> Vec<DVec2> {
    if overlay.kind == OverlayKind::RotatedRectangle {
        if let Some(corners) = rotated_rect::corners(&overlay.points) {
            return corners.to_vec();
        }
    }
    overlay.points.iter().map(geometry::vec).collect()
}

/// Classify what a drag starting at `pos` grabs on `overlay`.
///
/// Rotated rectangles add the rotation handle: when `pos` is inside both a
/// corner's and the rotation handle's threshold, the closer of the two
/// wins.
pub fn classify(overlay: &Overlay, pos: DVec2) -> HandleHit {
    let handles = handle_positions(overlay);

    let nearest = handles
        .iter()
        .enumerate()
        .map(|(i, h)| (i, geometry::length(pos - *h)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let rotation = if overlay.kind == OverlayKind::RotatedRectangle {
        rotated_rect::corners(&overlay.points)
            .map(|c| geometry::length(pos - rotated_rect::rotation_handle(&c)))
    } else {
        None
    };

    let point_hit = nearest.filter(|(_, d)| *d <= HANDLE_HIT_RADIUS);
    let rotation_hit = rotation.filter(|d| *d <= ROTATION_HANDLE_HIT_RADIUS);

    match (point_hit, rotation_hit) {
        (Some((i, pd)), Some(rd)) => {
            if pd <= rd {
                HandleHit::Point(i)
            } else {
                HandleHit::Rotation
            }
        }
        (Some((i, _)), None) => HandleHit::Point(i),
        (None, Some(_)) => HandleHit::Rotation,
        (None, None) => {
            if body_contains(&handles, pos) {
                HandleHit::Body
            } else {
                HandleHit::Miss
            }
        }
    }
}

/// Body hit: inside the bounding box of the handle positions, expanded by
/// [`BODY_HIT_TOLERANCE`].
fn body_contains(handles: &[DVec2], pos: DVec2) -> bool {
    let Some(first) = handles.first() else {
        return false;
    };
    let mut min = *first;
    let mut max = *first;
    for h in &handles[1..] {
        min = glm::vec2(min.x.min(h.x), min.y.min(h.y));
        max = glm::vec2(max.x.max(h.x), max.y.max(h.y));
    }
    pos.x >= min.x - BODY_HIT_TOLERANCE
        && pos.x <= max.x + BODY_HIT_TOLERANCE
        && pos.y >= min.y - BODY_HIT_TOLERANCE
        && pos.y <= max.y + BODY_HIT_TOLERANCE
}

/// Side table of in-flight drags, keyed by overlay id.
#[derive(Default)]
pub struct ProjectionEngine {
    captures: HashMap<OverlayId, DragCapture>,
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag. Returns `None` (a no-op) when `pos` resolves to no
    /// handle or body.
    pub fn begin_drag(&mut self, overlay: &Overlay, pos: DVec2) -> Option<HandleHit> {
        let hit = classify(overlay, pos);
        let mode = match hit {
            HandleHit::Point(i) => DragMode::Point(i),
            HandleHit::Rotation => DragMode::Rotation,
            HandleHit::Body => DragMode::Body,
            HandleHit::Miss => return None,
        };
        self.captures.insert(
            overlay.id,
            DragCapture {
                mode,
                origin: pos,
                original_points: overlay.points.clone(),
                corners: rotated_rect::corners(&overlay.points),
            },
        );
        Some(hit)
    }

    pub fn is_dragging(&self, id: OverlayId) -> bool {
        self.captures.contains_key(&id)
    }

    /// Apply one drag step, mutating the overlay's pixel coordinates.
    /// Domain coordinates must be re-derived by the caller afterwards.
    pub fn drag_to(
        &mut self,
        overlay: &mut Overlay,
        pos: DVec2,
        template: &dyn OverlayTemplate,
    ) -> Option<DragUpdate> {
        let capture = self.captures.get(&overlay.id)?;
        match capture.mode {
            DragMode::Point(index) if overlay.kind == OverlayKind::RotatedRectangle => {
                let corners = capture.corners?;
                // The corner index maps onto the captured point it edits:
                // both non-base corners re-derive the height point.
                let captured_index = match index {
                    // Base corners: recompute the base segment, re-derive
                    // the signed height from the unchanged opposite corner.
                    0 => {
                        overlay.points[0] = point_from_pixel(pos);
                        overlay.points[1] = point_from_pixel(corners[1]);
                        overlay.points[2] = point_from_pixel(corners[2]);
                        0
                    }
                    1 => {
                        overlay.points[0] = point_from_pixel(corners[0]);
                        overlay.points[1] = point_from_pixel(pos);
                        overlay.points[2] = point_from_pixel(corners[3]);
                        1
                    }
                    // Non-base corners: signed height against the
                    // unchanged base.
                    _ => {
                        overlay.points[0] = point_from_pixel(corners[0]);
                        overlay.points[1] = point_from_pixel(corners[1]);
                        overlay.points[2] = point_from_pixel(pos);
                        2
                    }
                };
                Some(DragUpdate::Point {
                    index: captured_index,
                })
            }
            DragMode::Point(index) => {
                let point = overlay.points.get_mut(index)?;
                set_pixel(point, pos);
                // Dependent points follow their anchor; the dragged point's
                // own lock keeps its constrained axis on the anchor value.
                catalog::reproject_locks(template, &mut overlay.points);
                Some(DragUpdate::Point { index })
            }
            DragMode::Rotation => {
                let corners = capture.corners?;
                let center = rotated_rect::center(&corners);
                let old_handle = rotated_rect::rotation_handle(&corners);
                let angle = geometry::angle_between(old_handle - center, pos - center);
                let rotated: Vec<DVec2> = corners
                    .iter()
                    .map(|c| geometry::rotate_around(*c, center, angle))
                    .collect();
                // Base from the rotated corners; the third corner becomes
                // the height point, preserving the signed-height magnitude.
                overlay.points[0] = point_from_pixel(rotated[0]);
                overlay.points[1] = point_from_pixel(rotated[1]);
                overlay.points[2] = point_from_pixel(rotated[2]);
                Some(DragUpdate::Shape {
                    delta: pos - capture.origin,
                })
            }
            DragMode::Body => {
                let delta = pos - capture.origin;
                for (point, original) in overlay
                    .points
                    .iter_mut()
                    .zip(capture.original_points.iter())
                {
                    set_pixel(point, geometry::vec(original) + delta);
                }
                Some(DragUpdate::Shape { delta })
            }
        }
    }

    /// Drop the transient capture. Derived geometry (the corner cache) is
    /// recomputed from the final points on the next use.
    pub fn end_drag(&mut self, id: OverlayId) -> bool {
        self.captures.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.captures.clear();
    }
}
