//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A stored scene document failed parse or schema validation.
    ///
    /// Callers loading persisted documents treat this as "no usable
    /// document" rather than a fatal condition.
    #[error("Corrupt scene document: {0}")]
    CorruptDocument(String),

    /// A scene document was written by an incompatible format version.
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(String),

    /// Scene serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
