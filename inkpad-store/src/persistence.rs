//! Draft auto-save, entry promotion, and view-state persistence.

use uuid::Uuid;

use inkpad_core::{Scene, SceneDocument, ALLOW_LISTED_PROPS, SCENE_DOCUMENT_VERSION};

use crate::records::{current_timestamp_ms, DraftRecord, EntryType, JournalEntry, ViewState};
use crate::{KvStore, MemoryStore, StoreError, StoreResult};

/// Store key of the single draft slot.
pub const DRAFT_KEY: &str = "journal.draft";

/// Store key of the journal entry list.
pub const ENTRIES_KEY: &str = "journal.entries";

/// Store key of the remembered view transform.
pub const VIEW_STATE_KEY: &str = "journal.view";

/// The persistence layer: exclusive owner of draft and entry storage.
///
/// The scene model has no knowledge of persistence; everything stored
/// here is derived from scenes handed in by the caller.
pub struct Persistence {
    store: Box<dyn KvStore>,
}

impl Persistence {
    /// Create a persistence layer over the given store.
    #[must_use]
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Create a layer over an unbounded in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Create a layer over a filesystem store rooted at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<std::path::PathBuf>) -> StoreResult<Self> {
        Ok(Self::new(Box::new(crate::FileStore::with_data_dir(
            data_dir,
        )?)))
    }

    // -----------------------------------------------------------------------
    // Draft slot
    // -----------------------------------------------------------------------

    /// Write the scene to the draft slot, overwriting any prior draft.
    ///
    /// A scene with zero objects deletes the slot instead, so an abandoned
    /// blank page never resurrects as a draft on the next mount.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails; the caller's scene is
    /// unaffected.
    pub fn save_draft(&self, scene: &Scene) -> StoreResult<()> {
        if scene.is_empty() {
            self.store.remove(DRAFT_KEY)?;
            tracing::debug!("Draft slot cleared for empty scene");
            return Ok(());
        }
        let record = DraftRecord {
            version: SCENE_DOCUMENT_VERSION.to_string(),
            timestamp: current_timestamp_ms(),
            canvas_data: SceneDocument::from_scene(scene),
            allow_listed_props: ALLOW_LISTED_PROPS.iter().map(ToString::to_string).collect(),
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(DRAFT_KEY, &json)?;
        tracing::debug!(objects = scene.object_count(), "Draft saved");
        Ok(())
    }

    /// Load the draft slot.
    ///
    /// Returns `None` when the slot is absent or unreadable; a corrupt
    /// draft is logged and treated as absent rather than failing the
    /// mount.
    #[must_use]
    pub fn load_draft(&self) -> Option<Scene> {
        let json = match self.store.get(DRAFT_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read draft slot: {e}");
                return None;
            }
        };
        let record: DraftRecord = match serde_json::from_str(&json) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Discarding corrupt draft record: {e}");
                return None;
            }
        };
        match record.canvas_data.into_scene() {
            Ok(scene) => {
                tracing::info!(objects = scene.object_count(), "Draft recovered");
                Some(scene)
            }
            Err(e) => {
                tracing::warn!("Discarding corrupt draft scene: {e}");
                None
            }
        }
    }

    /// Delete the draft slot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the removal fails.
    pub fn discard_draft(&self) -> StoreResult<()> {
        self.store.remove(DRAFT_KEY)
    }

    // -----------------------------------------------------------------------
    // Entries
    // -----------------------------------------------------------------------

    /// Promote the scene to a permanent journal entry and clear the draft
    /// slot.
    ///
    /// The entry append happens first; the draft slot is only cleared once
    /// the append has succeeded, so a failure can never lose the draft.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the scene cannot be serialized or the
    /// entry list cannot be written. The draft slot is left untouched in
    /// that case.
    pub fn promote_to_entry(&self, scene: &Scene, title: &str) -> StoreResult<JournalEntry> {
        let content = SceneDocument::from_scene(scene)
            .to_json()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let entry = self.append_entry(title, content, EntryType::Drawing)?;

        // The entry is durable; a failed draft cleanup leaves a stale
        // draft behind but must not report the promotion as failed.
        if let Err(e) = self.store.remove(DRAFT_KEY) {
            tracing::warn!("Entry saved but draft slot could not be cleared: {e}");
        }
        tracing::info!(id = %entry.id, "Scene promoted to journal entry");
        Ok(entry)
    }

    /// Append a plain text entry to the journal.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the entry list cannot be written.
    pub fn add_text_entry(&self, title: &str, body: &str) -> StoreResult<JournalEntry> {
        self.append_entry(title, body.to_string(), EntryType::Text)
    }

    /// All journal entries in creation order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read. A corrupt
    /// entry list is logged and treated as empty.
    pub fn list_entries(&self) -> StoreResult<Vec<JournalEntry>> {
        match self.store.get(ENTRIES_KEY)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    tracing::warn!("Discarding corrupt entry list: {e}");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    /// Delete an entry by ID.
    ///
    /// Returns whether an entry was actually removed; an unknown ID is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the entry list cannot be read or
    /// written.
    pub fn delete_entry(&self, id: &str) -> StoreResult<bool> {
        let mut entries = self.list_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_entries(&entries)?;
        Ok(true)
    }

    fn append_entry(
        &self,
        title: &str,
        content: String,
        entry_type: EntryType,
    ) -> StoreResult<JournalEntry> {
        let now = current_timestamp_ms();
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content,
            entry_type,
            created_at: now,
            updated_at: now,
            is_draft: false,
        };
        let mut entries = self.list_entries()?;
        entries.push(entry.clone());
        self.write_entries(&entries)?;
        Ok(entry)
    }

    fn write_entries(&self, entries: &[JournalEntry]) -> StoreResult<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(ENTRIES_KEY, &json)
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    /// Remember the presentation transform.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_view_state(&self, view: ViewState) -> StoreResult<()> {
        let json =
            serde_json::to_string(&view).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(VIEW_STATE_KEY, &json)
    }

    /// Load the remembered presentation transform, if any. Corrupt state
    /// is treated as absent.
    #[must_use]
    pub fn load_view_state(&self) -> Option<ViewState> {
        match self.store.get(VIEW_STATE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(view) => Some(view),
                Err(e) => {
                    tracing::warn!("Discarding corrupt view state: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read view state: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::{ObjectKind, PathPoint, SceneObject};

    fn scene_with_stroke() -> Scene {
        let mut scene = Scene::new(800.0, 600.0, "#ffffff");
        scene.add_object(SceneObject::new(ObjectKind::Stroke {
            points: vec![
                PathPoint::new(1.0, 1.0),
                PathPoint::new(2.0, 2.0),
                PathPoint::new(3.0, 3.0),
            ],
            color: "#000000".to_string(),
            width: 2.0,
        }));
        scene
    }

    #[test]
    fn test_draft_round_trip() {
        let persistence = Persistence::in_memory();
        persistence.save_draft(&scene_with_stroke()).expect("save");

        let restored = persistence.load_draft().expect("draft present");
        assert_eq!(restored.object_count(), 1);
        match &restored.objects().next().expect("one object").kind {
            ObjectKind::Stroke {
                points,
                color,
                width,
            } => {
                assert_eq!(points.len(), 3);
                assert_eq!(color, "#000000");
                assert!((width - 2.0).abs() < f32::EPSILON);
            }
            other => panic!("expected stroke, got {other:?}"),
        };
    }

    #[test]
    fn test_empty_scene_deletes_draft_slot() {
        let persistence = Persistence::in_memory();
        persistence.save_draft(&scene_with_stroke()).expect("save");
        assert!(persistence.load_draft().is_some());

        let empty = Scene::new(800.0, 600.0, "#ffffff");
        persistence.save_draft(&empty).expect("save empty");
        assert!(persistence.load_draft().is_none());
    }

    #[test]
    fn test_corrupt_draft_is_treated_as_absent() {
        let store = MemoryStore::new();
        store.set(DRAFT_KEY, "{ this is not json").expect("seed");
        let persistence = Persistence::new(Box::new(store));
        assert!(persistence.load_draft().is_none());
    }

    #[test]
    fn test_promote_clears_draft() {
        let persistence = Persistence::in_memory();
        let scene = scene_with_stroke();
        persistence.save_draft(&scene).expect("save");

        let entry = persistence
            .promote_to_entry(&scene, "First sketch")
            .expect("promote");
        assert_eq!(entry.title, "First sketch");
        assert_eq!(entry.entry_type, EntryType::Drawing);
        assert!(!entry.is_draft);
        assert!(entry.content.contains("\"objects\""));

        assert!(persistence.load_draft().is_none());
        let entries = persistence.list_entries().expect("list");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry.id);
    }

    #[test]
    fn test_failed_promote_keeps_draft() {
        // Measure the draft payload, then size the quota so the draft fits
        // but the entry list write does not.
        let scene = scene_with_stroke();
        let probe = std::sync::Arc::new(MemoryStore::new());
        Persistence::new(Box::new(probe.clone()))
            .save_draft(&scene)
            .expect("save");
        let draft_len = probe
            .get(DRAFT_KEY)
            .expect("read")
            .expect("draft present")
            .len();

        let persistence = Persistence::new(Box::new(MemoryStore::with_quota(draft_len + 50)));
        persistence.save_draft(&scene).expect("draft fits");

        let result = persistence.promote_to_entry(&scene, "Too big");
        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert!(persistence.load_draft().is_some(), "draft must survive");
    }

    #[test]
    fn test_text_entries_share_the_list() {
        let persistence = Persistence::in_memory();
        persistence
            .add_text_entry("Plain day", "Nothing to draw.")
            .expect("text entry");
        persistence
            .promote_to_entry(&scene_with_stroke(), "Sketch day")
            .expect("drawing entry");

        let entries = persistence.list_entries().expect("list");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_type, EntryType::Text);
        assert_eq!(entries[1].entry_type, EntryType::Drawing);
        assert!(entries[0].created_at <= entries[1].created_at);
    }

    #[test]
    fn test_delete_entry() {
        let persistence = Persistence::in_memory();
        let entry = persistence
            .add_text_entry("Delete me", "...")
            .expect("entry");

        assert!(persistence.delete_entry(&entry.id).expect("delete"));
        assert!(persistence.list_entries().expect("list").is_empty());
        assert!(!persistence.delete_entry("unknown").expect("no-op"));
    }

    #[test]
    fn test_corrupt_entry_list_is_treated_as_empty() {
        let store = MemoryStore::new();
        store.set(ENTRIES_KEY, "[{ nope").expect("seed");
        let persistence = Persistence::new(Box::new(store));
        assert!(persistence.list_entries().expect("list").is_empty());
    }

    #[test]
    fn test_view_state_round_trip() {
        let persistence = Persistence::in_memory();
        assert!(persistence.load_view_state().is_none());

        persistence
            .save_view_state(ViewState {
                zoom: 1.5,
                pan_x: 10.0,
                pan_y: -4.0,
            })
            .expect("save");
        let view = persistence.load_view_state().expect("present");
        assert!((view.zoom - 1.5).abs() < f32::EPSILON);
        assert!((view.pan_x - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_file_backed_draft_survives_restart() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let persistence = Persistence::with_data_dir(dir.path()).expect("store");
            persistence.save_draft(&scene_with_stroke()).expect("save");
        }
        let persistence = Persistence::with_data_dir(dir.path()).expect("store");
        assert!(persistence.load_draft().is_some());
    }
}
