//! The key-value store boundary.
//!
//! Persistence talks to a synchronous string-keyed get/set/remove store,
//! matching what the shipped app has available (browser local storage).
//! Two backends are provided: an in-memory map for tests and ephemeral
//! sessions, and a filesystem store keeping one JSON file per key.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::{StoreError, StoreResult};

/// A synchronous string-keyed store.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written, e.g.
    /// when its quota is exhausted.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the value stored under `key`. Absent keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store with an optional byte quota.
///
/// The quota mirrors the failure mode of browser local storage, where a
/// write can be refused once the origin's allowance is spent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store refusing writes past `quota_bytes` of total value
    /// payload.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(limit) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if used + value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    used: used + value.len(),
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Filesystem store keeping one JSON file per key in a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `data_dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

/// Sanitize a key for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").expect("read").is_none());

        store.set("k", "v1").expect("write");
        store.set("k", "v2").expect("overwrite");
        assert_eq!(store.get("k").expect("read").as_deref(), Some("v2"));

        store.remove("k").expect("remove");
        assert!(store.get("k").expect("read").is_none());
        store.remove("k").expect("removing absent key is a no-op");
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "12345").expect("within quota");
        let err = store.set("b", "1234567").expect_err("over quota");
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 10, .. }));

        // Overwriting the same key only counts the new payload.
        store.set("a", "1234567890").expect("replace within quota");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::with_data_dir(dir.path()).expect("store");

        assert!(store.get("journal.draft").expect("read").is_none());
        store.set("journal.draft", "{}").expect("write");
        assert_eq!(
            store.get("journal.draft").expect("read").as_deref(),
            Some("{}")
        );

        // Keys map to sanitized file names.
        assert!(dir.path().join("journal_draft.json").exists());

        store.remove("journal.draft").expect("remove");
        assert!(store.get("journal.draft").expect("read").is_none());
        store.remove("journal.draft").expect("absent is a no-op");
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("simple"), "simple");
        assert_eq!(sanitize_key("journal.entries"), "journal_entries");
        assert_eq!(sanitize_key("has/slash"), "has_slash");
        assert_eq!(sanitize_key("with-dash_ok"), "with-dash_ok");
    }
}
