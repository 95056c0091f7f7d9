//! Error types for engine operations.

use thiserror::Error;

use inkpad_store::StoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine façade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An imported image could not be decoded; the import is aborted and
    /// no object is added.
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// A persistence operation failed. The in-memory scene is unaffected;
    /// callers should notify the user without interrupting editing.
    #[error(transparent)]
    Store(#[from] StoreError),
}
