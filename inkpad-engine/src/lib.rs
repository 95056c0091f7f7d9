//! # Inkpad Engine
//!
//! The editing engine behind an Inkpad journal page: one façade owning the
//! scene, the undo history, the persistence layer, the tool state machine,
//! and the viewport, so that every mutation flows through a single
//! dispatch point.
//!
//! ```text
//! pointer / commands
//!        │
//!        ▼
//!  ToolController ──ToolAction──► Engine::apply(Mutation)
//!                                   │
//!                     ┌─────────────┼──────────────┐
//!                     ▼             ▼              ▼
//!                  Scene        History push   debounced
//!                  mutation     (snapshot)     draft save
//! ```
//!
//! The draft slot and the undo stack are always derived from the same
//! mutation stream: a process restart mid-session loses at most the last
//! debounce window of edits, never a diverging half of the state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]

pub mod config;
pub mod debounce;
pub mod decoder;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use debounce::SaveDebouncer;
pub use decoder::{DecodedImage, ImageDecoder, RasterDecoder};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
