//! # Inkpad Core
//!
//! Core canvas logic for the Inkpad journaling app: the drawing surface
//! users write and sketch on, independent of any UI framework.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                inkpad-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Scene Model     │  Tool State Machine      │
//! │  - Objects       │  - Pen / Eraser          │
//! │  - Hit testing   │  - Text / Lasso          │
//! │  - Selection     │  - Transform             │
//! ├─────────────────────────────────────────────┤
//! │  Codec           │  History    │  Viewport  │
//! │  - Documents     │  - Undo     │  - Zoom    │
//! │  - Allow-list    │  - Redo     │  - Pan     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Higher layers (persistence, the engine façade) live in their own crates
//! and consume this one through the [`Mutation`] stream.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod history;
pub mod input;
pub mod mutation;
pub mod object;
pub mod scene;
pub mod schema;
pub mod tools;
pub mod viewport;

pub use error::{CanvasError, CanvasResult};
pub use history::History;
pub use input::{PointerEvent, PointerPhase};
pub use mutation::Mutation;
pub use object::{
    InteractionFlags, ObjectId, ObjectKind, PathPoint, Rect, SceneObject, TextAlign, TextShadow,
};
pub use scene::Scene;
pub use schema::{ObjectDocument, SceneDocument, ALLOW_LISTED_PROPS, SCENE_DOCUMENT_VERSION};
pub use tools::{PenStyle, TextStyle, Tool, ToolAction, ToolController};
pub use viewport::{Viewport, MAX_ZOOM, MIN_ZOOM};

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
