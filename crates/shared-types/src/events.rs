//! Pointer and overlay event types
//!
//! Overlay callbacks use a closed set of event kinds with precisely-typed
//! payloads instead of loosely-typed duck-typed objects.

use crate::{OverlayId, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalPosition {
    pub x: f64,
    pub y: f64,
}

impl PhysicalPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementState {
    Pressed,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Pointer events delivered by the rendering surface.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    CursorMoved {
        position: PhysicalPosition,
    },
    MouseInput {
        state: ElementState,
        button: MouseButton,
        position: PhysicalPosition,
    },
    /// Abort the in-flight capture (Escape).
    Cancel,
    /// End an unbounded capture, discarding the trailing preview point.
    Finalize,
}

/// Events emitted by the overlay engine after processing input.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    /// An overlay finished capture and was registered on the surface.
    DrawEnd { id: OverlayId },
    Select { id: OverlayId },
    Deselect { id: OverlayId },
    /// A single control point moved during a drag.
    PointMove {
        id: OverlayId,
        point_index: usize,
        point: Point,
    },
    /// The whole shape moved by `delta` pixels from its drag origin.
    PressedMove {
        id: OverlayId,
        delta: PhysicalPosition,
    },
}

impl OverlayEvent {
    /// The overlay the event refers to.
    pub fn overlay_id(&self) -> OverlayId {
        match self {
            OverlayEvent::DrawEnd { id }
            | OverlayEvent::Select { id }
            | OverlayEvent::Deselect { id }
            | OverlayEvent::PointMove { id, .. }
            | OverlayEvent::PressedMove { id, .. } => *id,
        }
    }
}
