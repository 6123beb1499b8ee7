//! Overlay annotation engine
//!
//! Lets a trader draw, edit and persist geometric studies (trend lines,
//! rectangles, retracements, position brackets, free text) on top of a
//! price/time chart. The engine owns the drawing state machine, the edit
//! projection math, the snapshot history and the durable overlay store;
//! rendering and text input are injected collaborators.

pub mod catalog;
pub mod engine;
pub mod figure;
pub mod geometry;
pub mod history;
pub mod projection;
pub mod prompt;
pub mod state_machine;
pub mod store;
pub mod surface;

pub use engine::OverlayEngine;
pub use figure::{Coord, Figure, LabelTone};
pub use prompt::{PromptResponse, TextPrompt};
pub use state_machine::ActiveTool;
pub use surface::{OverlayFilter, OverlaySpec, RenderSurface};

pub use chart_studies_shared as shared;
