//! Overlay engine facade
//!
//! Owns the catalog, store, history and the two state machines, and talks
//! to the injected collaborators (rendering surface, text prompt). Pointer
//! events come in; typed overlay events go out. The engine raises the
//! history commit boundary at gesture ends — draw commit, delete, clear and
//! drag end — and leaves any further debouncing to the caller.

use chart_studies_shared::events::{
    ElementState, MouseButton, OverlayEvent, PhysicalPosition, PointerEvent,
};
use chart_studies_shared::{Overlay, OverlayId, OverlayKind, Point};
use nalgebra_glm as glm;

use crate::catalog::{text, OverlayCatalog};
use crate::figure::Figure;
use crate::history::HistoryStack;
use crate::projection::{self, DragUpdate, ProjectionEngine};
use crate::prompt::{PromptResponse, TextPrompt};
use crate::state_machine::{ActiveTool, DrawTransition, DrawingStateMachine};
use crate::store::OverlayStore;
use crate::surface::{OverlayFilter, OverlaySpec, RenderSurface};

pub struct OverlayEngine {
    catalog: OverlayCatalog,
    surface: Box<dyn RenderSurface>,
    prompt: Box<dyn TextPrompt>,
    store: OverlayStore,
    history: HistoryStack,
    drawing: DrawingStateMachine,
    projection: ProjectionEngine,
    /// Overlays currently materialized, in creation order. Kept in sync
    /// with the surface through the engine's own calls.
    live: Vec<Overlay>,
    selected: Option<OverlayId>,
    dragging: Option<OverlayId>,
    pending_text: Option<OverlayId>,
}

impl OverlayEngine {
    pub fn new(surface: Box<dyn RenderSurface>, prompt: Box<dyn TextPrompt>) -> Self {
        Self {
            catalog: OverlayCatalog::with_builtins(),
            surface,
            prompt,
            store: OverlayStore::new(),
            history: HistoryStack::new(),
            drawing: DrawingStateMachine::new(),
            projection: ProjectionEngine::new(),
            live: Vec::new(),
            selected: None,
            dragging: None,
            pending_text: None,
        }
    }

    pub fn catalog(&self) -> &OverlayCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn active_tool(&self) -> ActiveTool {
        self.drawing.tool()
    }

    pub fn select_tool(&mut self, kind: OverlayKind) {
        self.drawing.select_tool(kind);
    }

    pub fn selected(&self) -> Option<OverlayId> {
        self.selected
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.live.iter().find(|o| o.id == id)
    }

    /// Ids currently materialized, in order.
    pub fn live_ids(&self) -> Vec<OverlayId> {
        self.live.iter().map(|o| o.id).collect()
    }

    /// Id awaiting text solicitation after a free-text commit, if any.
    pub fn pending_text(&self) -> Option<OverlayId> {
        self.pending_text
    }

    /// Route one pointer event through the drawing machine or the edit
    /// engine. Returns the overlay events the gesture produced.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<OverlayEvent> {
        match event {
            PointerEvent::CursorMoved { position } => self.on_cursor_moved(position),
            PointerEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                position,
            } => self.on_press(position),
            PointerEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => self.on_release(),
            PointerEvent::MouseInput { .. } => Vec::new(),
            PointerEvent::Cancel => {
                self.drawing.cancel();
                Vec::new()
            }
            PointerEvent::Finalize => match self.drawing.finalize(&self.catalog) {
                DrawTransition::Committed { kind, points } => self.commit_overlay(kind, points),
                _ => Vec::new(),
            },
        }
    }

    /// Figures for the in-flight capture, preview point included.
    pub fn preview_figures(&self) -> Vec<Figure> {
        let Some((kind, points)) = self.drawing.in_flight() else {
            return Vec::new();
        };
        let Some(template) = self.catalog.get(kind) else {
            return Vec::new();
        };
        let style = self.surface.styles();
        template.figures(points, &style, None)
    }

    /// Resolve the text solicitation left behind by a free-text commit.
    /// Geometry is already committed; this only assigns `extend_data`.
    pub async fn resolve_pending_text(&mut self) {
        let Some(id) = self.pending_text.take() else {
            return;
        };
        self.solicit_text(id).await;
    }

    /// Re-solicit the content of an existing free-text overlay.
    pub async fn edit_text(&mut self, id: OverlayId) {
        self.solicit_text(id).await;
    }

    /// Commit boundary: snapshot the current overlay id set. Idempotent
    /// when nothing changed; debouncing beyond that is caller policy.
    pub fn save_now(&mut self) {
        let ids = self.live_ids();
        self.history.save_now(&ids);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let ids = match self.history.undo() {
            Some(ids) => ids.to_vec(),
            None => return false,
        };
        self.materialize(&ids);
        true
    }

    pub fn redo(&mut self) -> bool {
        let ids = match self.history.redo() {
            Some(ids) => ids.to_vec(),
            None => return false,
        };
        self.materialize(&ids);
        true
    }

    /// Remove matching overlays from the surface. Their reconstruction
    /// data stays in the store, so undo can bring them back.
    pub fn remove(&mut self, filter: &OverlayFilter) {
        self.surface.remove_overlay(filter);
        let removed: Vec<OverlayId> = self
            .live
            .iter()
            .filter(|o| filter.matches(o))
            .map(|o| o.id)
            .collect();
        self.live.retain(|o| !filter.matches(o));
        for id in removed {
            self.projection.end_drag(id);
            if self.selected == Some(id) {
                self.selected = None;
            }
            if self.dragging == Some(id) {
                self.dragging = None;
            }
            if self.pending_text == Some(id) {
                self.pending_text = None;
            }
        }
        self.save_now();
    }

    pub fn clear_all(&mut self) {
        self.remove(&OverlayFilter::All);
    }

    /// Remove an overlay and drop its reconstruction data for good. This
    /// is the only operation that shrinks the store.
    pub fn delete_permanently(&mut self, id: OverlayId) {
        self.remove(&OverlayFilter::Id(id));
        self.store.remove_permanently(id);
    }

    fn point_at(&self, position: PhysicalPosition) -> Point {
        let (time_index, price) = self.surface.pixel_to_domain(position.x, position.y);
        Point::new(position.x, position.y, time_index, price)
    }

    fn on_cursor_moved(&mut self, position: PhysicalPosition) -> Vec<OverlayEvent> {
        if matches!(self.drawing.tool(), ActiveTool::Draw(_)) {
            let point = self.point_at(position);
            self.drawing.pointer_moved(point, &self.catalog);
            return Vec::new();
        }

        let Some(id) = self.dragging else {
            return Vec::new();
        };
        let pos = glm::vec2(position.x, position.y);
        let Some(index) = self.live.iter().position(|o| o.id == id) else {
            return Vec::new();
        };
        let kind = self.live[index].kind;
        let Some(template) = self.catalog.get(kind) else {
            return Vec::new();
        };
        let Some(update) = self
            .projection
            .drag_to(&mut self.live[index], pos, template)
        else {
            return Vec::new();
        };

        // Re-derive domain coordinates from the new pixel positions, then
        // push the updated geometry to the surface.
        let overlay = &mut self.live[index];
        for p in overlay.points.iter_mut() {
            let (time_index, price) = self.surface.pixel_to_domain(p.x, p.y);
            p.time_index = time_index;
            p.price = price;
        }
        let figures = template.figures(&overlay.points, &overlay.style, overlay.extend_data.as_ref());
        self.surface.update_overlay(id, &overlay.points, &figures);

        match update {
            DragUpdate::Point { index: point_index } => {
                match overlay.points.get(point_index) {
                    Some(point) => vec![OverlayEvent::PointMove {
                        id,
                        point_index,
                        point: *point,
                    }],
                    None => Vec::new(),
                }
            }
            DragUpdate::Shape { delta } => vec![OverlayEvent::PressedMove {
                id,
                delta: PhysicalPosition::new(delta.x, delta.y),
            }],
        }
    }

    fn on_press(&mut self, position: PhysicalPosition) -> Vec<OverlayEvent> {
        if matches!(self.drawing.tool(), ActiveTool::Draw(_)) {
            let point = self.point_at(position);
            return match self.drawing.pointer_clicked(point, &self.catalog) {
                DrawTransition::Committed { kind, points } => self.commit_overlay(kind, points),
                _ => Vec::new(),
            };
        }

        let pos = glm::vec2(position.x, position.y);
        let mut events = Vec::new();

        // Topmost overlay wins the hit.
        let hit = self
            .live
            .iter()
            .rev()
            .find_map(|o| match projection::classify(o, pos) {
                projection::HandleHit::Miss => None,
                _ => Some(o.id),
            });

        match hit {
            Some(id) => {
                if self.selected != Some(id) {
                    if let Some(previous) = self.selected.take() {
                        events.push(OverlayEvent::Deselect { id: previous });
                    }
                    self.selected = Some(id);
                    events.push(OverlayEvent::Select { id });
                }
                if let Some(overlay) = self.live.iter().find(|o| o.id == id) {
                    if self.projection.begin_drag(overlay, pos).is_some() {
                        self.dragging = Some(id);
                    }
                }
            }
            None => {
                if let Some(previous) = self.selected.take() {
                    events.push(OverlayEvent::Deselect { id: previous });
                }
            }
        }
        events
    }

    fn on_release(&mut self) -> Vec<OverlayEvent> {
        let Some(id) = self.dragging.take() else {
            return Vec::new();
        };
        self.projection.end_drag(id);
        // The gesture is over: refresh the reconstruction data and raise
        // the commit boundary.
        if let Some(index) = self.live.iter().position(|o| o.id == id) {
            self.store.record(&self.live[index]);
        }
        self.save_now();
        Vec::new()
    }

    fn commit_overlay(&mut self, kind: OverlayKind, points: Vec<Point>) -> Vec<OverlayEvent> {
        let style = self.surface.styles();
        let id = self.surface.create_overlay(OverlaySpec {
            id: None,
            kind,
            points: points.clone(),
            style,
            extend_data: None,
            group_id: None,
        });
        let overlay = Overlay {
            id,
            kind,
            points,
            style,
            extend_data: None,
            group_id: None,
        };
        self.store.record(&overlay);
        self.live.push(overlay);
        self.save_now();

        if self.catalog.get(kind).is_some_and(|t| t.solicits_text()) {
            self.pending_text = Some(id);
        }
        vec![OverlayEvent::DrawEnd { id }]
    }

    /// Rebuild the surface to show exactly `target_ids`, in order, from
    /// stored reconstruction data. Ids with no store entry are skipped
    /// with a diagnostic. Never writes to the store.
    fn materialize(&mut self, target_ids: &[OverlayId]) {
        self.surface.remove_overlay(&OverlayFilter::All);
        self.live.clear();
        self.selected = None;
        self.dragging = None;
        self.projection.clear();

        for id in target_ids {
            let Some(stored) = self.store.get(*id) else {
                log::warn!("materialize: no reconstruction data for overlay {id}, skipping");
                continue;
            };
            let overlay = stored.clone();
            self.surface.create_overlay(OverlaySpec::from_overlay(&overlay));
            self.live.push(overlay);
        }
    }

    async fn solicit_text(&mut self, id: OverlayId) {
        let default_value = self
            .overlay(id)
            .and_then(|o| o.extend_data.as_ref())
            .and_then(|v| v.as_str())
            .unwrap_or(text::DEFAULT_TEXT_PLACEHOLDER)
            .to_string();

        let request = self.prompt.request_text("Annotation text", &default_value);
        let content = match request.await {
            PromptResponse::Text(content) => content,
            // Cancellation keeps the placeholder (or prior content).
            PromptResponse::Cancelled => default_value,
        };

        let Some(index) = self.live.iter().position(|o| o.id == id) else {
            return;
        };
        let overlay = &mut self.live[index];
        overlay.extend_data = Some(serde_json::Value::String(content));
        self.store.record(&self.live[index]);

        let overlay = &self.live[index];
        if let Some(template) = self.catalog.get(overlay.kind) {
            let figures =
                template.figures(&overlay.points, &overlay.style, overlay.extend_data.as_ref());
            self.surface.update_overlay(id, &overlay.points, &figures);
        }
    }
}
