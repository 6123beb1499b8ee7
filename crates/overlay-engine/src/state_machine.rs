//! Multi-step capture state machine for drawing tools
//!
//! Pointer moves update a trailing preview point without advancing the
//! step; pointer clicks commit that point and advance. When the captured
//! count reaches the kind's arity the machine hands the points back and
//! resets the tool to cursor. Cancel discards everything. Unbounded kinds
//! commit through an explicit finalize, which drops the trailing preview.

use chart_studies_shared::{OverlayKind, Point};

use crate::catalog::{self, Arity, OverlayCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    #[default]
    Cursor,
    Draw(OverlayKind),
}

#[derive(Debug, Clone, Default)]
enum DrawPhase {
    #[default]
    Idle,
    Drawing {
        kind: OverlayKind,
        /// Committed points, possibly followed by one trailing preview.
        points: Vec<Point>,
        /// Number of committed points (excludes the trailing preview).
        step: usize,
    },
}

/// Outcome of feeding one pointer signal to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawTransition {
    /// The signal was not for a drawing gesture.
    Ignored,
    /// Capture continues.
    InProgress,
    /// All points captured; the overlay should be registered.
    Committed {
        kind: OverlayKind,
        points: Vec<Point>,
    },
    /// Capture discarded; no overlay created.
    Cancelled,
}

#[derive(Default)]
pub struct DrawingStateMachine {
    tool: ActiveTool,
    phase: DrawPhase,
}

impl DrawingStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> ActiveTool {
        self.tool
    }

    /// Arm a drawing tool. Any in-flight capture is discarded.
    pub fn select_tool(&mut self, kind: OverlayKind) {
        self.phase = DrawPhase::Idle;
        self.tool = ActiveTool::Draw(kind);
    }

    pub fn reset_to_cursor(&mut self) {
        self.phase = DrawPhase::Idle;
        self.tool = ActiveTool::Cursor;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, DrawPhase::Drawing { .. })
    }

    /// Kind and points of the in-flight capture, preview included.
    pub fn in_flight(&self) -> Option<(OverlayKind, &[Point])> {
        match &self.phase {
            DrawPhase::Drawing { kind, points, .. } => Some((*kind, points.as_slice())),
            DrawPhase::Idle => None,
        }
    }

    /// Open the capture on the first pointer signal after arming a tool.
    fn open_capture_if_armed(&mut self) {
        if let ActiveTool::Draw(kind) = self.tool {
            if matches!(self.phase, DrawPhase::Idle) {
                self.phase = DrawPhase::Drawing {
                    kind,
                    points: Vec::new(),
                    step: 0,
                };
            }
        }
    }

    /// Update the trailing preview point. Does not advance the step.
    pub fn pointer_moved(&mut self, point: Point, catalog: &OverlayCatalog) {
        self.open_capture_if_armed();
        let DrawPhase::Drawing { kind, points, step } = &mut self.phase else {
            return;
        };
        let Some(template) = catalog.get(*kind) else {
            return;
        };
        let locked = catalog::apply_lock(template.point_lock(*step), point, points);
        if points.len() == *step {
            points.push(locked);
        } else {
            points[*step] = locked;
        }
    }

    /// Commit the point under the pointer and advance the step. Returns
    /// `Committed` once the captured count reaches the kind's arity, with
    /// the tool reset to cursor.
    pub fn pointer_clicked(&mut self, point: Point, catalog: &OverlayCatalog) -> DrawTransition {
        self.open_capture_if_armed();
        let DrawPhase::Drawing { kind, points, step } = &mut self.phase else {
            return DrawTransition::Ignored;
        };
        let kind = *kind;
        let Some(template) = catalog.get(kind) else {
            return DrawTransition::Ignored;
        };
        let locked = catalog::apply_lock(template.point_lock(*step), point, points);
        if points.len() == *step {
            points.push(locked);
        } else {
            points[*step] = locked;
        }
        *step += 1;

        if let Arity::Fixed(arity) = template.arity() {
            if *step >= arity {
                let mut captured = std::mem::take(points);
                captured.truncate(arity);
                self.reset_to_cursor();
                return DrawTransition::Committed {
                    kind,
                    points: captured,
                };
            }
        }
        DrawTransition::InProgress
    }

    /// Discard the capture and return to idle with the cursor tool.
    pub fn cancel(&mut self) -> DrawTransition {
        match self.phase {
            DrawPhase::Drawing { .. } => {
                self.reset_to_cursor();
                DrawTransition::Cancelled
            }
            DrawPhase::Idle => {
                if self.tool != ActiveTool::Cursor {
                    self.tool = ActiveTool::Cursor;
                }
                DrawTransition::Ignored
            }
        }
    }

    /// End an unbounded capture, discarding the trailing preview point.
    /// Finalizing with fewer than two committed points cancels instead.
    pub fn finalize(&mut self, catalog: &OverlayCatalog) -> DrawTransition {
        let DrawPhase::Drawing { kind, points, step } = &mut self.phase else {
            return DrawTransition::Ignored;
        };
        let kind = *kind;
        let Some(template) = catalog.get(kind) else {
            return DrawTransition::Ignored;
        };
        if template.arity() != Arity::Unbounded {
            return DrawTransition::Ignored;
        }
        if *step < 2 {
            self.reset_to_cursor();
            return DrawTransition::Cancelled;
        }
        let committed = *step;
        let mut captured = std::mem::take(points);
        captured.truncate(committed);
        self.reset_to_cursor();
        DrawTransition::Committed {
            kind,
            points: captured,
        }
    }
}
