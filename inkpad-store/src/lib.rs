//! # Inkpad Store
//!
//! Persistence layer for the Inkpad journaling app: a single auto-saved
//! draft slot, the permanent journal entry list, and the remembered view
//! transform, all backed by a synchronous string-keyed store.
//!
//! The in-memory scene is always the source of truth; a failing store
//! call surfaces as a [`StoreError`] and never corrupts the editing
//! session.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod kv;
pub mod persistence;
pub mod records;

pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KvStore, MemoryStore};
pub use persistence::{Persistence, DRAFT_KEY, ENTRIES_KEY, VIEW_STATE_KEY};
pub use records::{current_timestamp_ms, DraftRecord, EntryType, JournalEntry, ViewState};
