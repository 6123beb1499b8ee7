//! Rendering-surface collaborator interface
//!
//! The surface owns coordinate transforms and everything visible. The
//! engine never infers visibility on its own: `overlay_ids` is the sole
//! source of truth for what is on screen.

use chart_studies_shared::{Overlay, OverlayId, OverlayKind, OverlayStyle, Point};
use serde::{Deserialize, Serialize};

use crate::figure::Figure;

/// Which overlays a removal targets.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayFilter {
    All,
    Id(OverlayId),
    Group(String),
    Kind(OverlayKind),
}

impl OverlayFilter {
    pub fn matches(&self, overlay: &Overlay) -> bool {
        match self {
            OverlayFilter::All => true,
            OverlayFilter::Id(id) => overlay.id == *id,
            OverlayFilter::Group(group) => overlay.group_id.as_deref() == Some(group.as_str()),
            OverlayFilter::Kind(kind) => overlay.kind == *kind,
        }
    }
}

/// Reconstruction payload handed to the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySpec {
    /// Reuse this id when re-materializing; `None` lets the surface assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OverlayId>,
    pub kind: OverlayKind,
    pub points: Vec<Point>,
    pub style: OverlayStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl OverlaySpec {
    pub fn from_overlay(overlay: &Overlay) -> Self {
        Self {
            id: Some(overlay.id),
            kind: overlay.kind,
            points: overlay.points.clone(),
            style: overlay.style,
            extend_data: overlay.extend_data.clone(),
            group_id: overlay.group_id.clone(),
        }
    }
}

/// The engine's view of the chart it annotates.
pub trait RenderSurface {
    /// Pixel position of a domain coordinate.
    fn domain_to_pixel(&self, time_index: f64, price: f64) -> (f64, f64);

    /// Domain coordinate under a pixel position.
    fn pixel_to_domain(&self, x: f64, y: f64) -> (f64, f64);

    /// Create an overlay; returns its id, honoring `spec.id` when given.
    fn create_overlay(&mut self, spec: OverlaySpec) -> OverlayId;

    /// Remove every overlay matching `filter`.
    fn remove_overlay(&mut self, filter: &OverlayFilter);

    /// Push updated geometry for an existing overlay.
    fn update_overlay(&mut self, id: OverlayId, points: &[Point], figures: &[Figure]);

    /// Ids currently visible, in creation order.
    fn overlay_ids(&self) -> Vec<OverlayId>;

    fn styles(&self) -> OverlayStyle;

    fn set_styles(&mut self, styles: OverlayStyle);
}
