//! Error types for persistence operations.

use thiserror::Error;

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failures surfaced to the caller.
///
/// None of these are fatal to the editing session: the in-memory scene
/// remains authoritative and the caller decides whether to notify the
/// user or retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store refused a write because its capacity is
    /// exhausted.
    #[error("Storage quota exceeded: {used} of {limit} bytes in use")]
    QuotaExceeded {
        /// Bytes currently stored.
        used: usize,
        /// Configured capacity in bytes.
        limit: usize,
    },

    /// An I/O error from a filesystem-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
