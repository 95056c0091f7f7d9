//! Linear undo/redo history of scene snapshots.

use crate::{Scene, SceneDocument};

/// Linear undo/redo stack of serialized scene snapshots.
///
/// Snapshots are full-scene serializations rather than diffs; journal
/// pages hold tens of objects, so correctness wins over compactness here.
/// The cursor always points at the snapshot matching the live scene (or
/// nothing, when the history is empty). Pushing truncates any snapshots
/// past the cursor, so redo state is discarded on new edits.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<String>,
    /// Index of the current snapshot; `None` while empty.
    cursor: Option<usize>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the scene and make it the new head.
    ///
    /// Any redo branch beyond the cursor is discarded. A scene that fails
    /// to serialize is logged and skipped rather than interrupting the
    /// editing session.
    pub fn push(&mut self, scene: &Scene) {
        let json = match SceneDocument::from_scene(scene).to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Skipping unserializable history snapshot: {e}");
                return;
            }
        };
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(json);
        self.cursor = Some(self.snapshots.len() - 1);
        tracing::debug!(depth = self.snapshots.len(), "History snapshot pushed");
    }

    /// Step back one snapshot and return the scene it holds.
    ///
    /// A no-op returning `None` when already at the oldest snapshot (or
    /// empty); the baseline snapshot itself is never popped.
    pub fn undo(&mut self) -> Option<Scene> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.materialize(cursor - 1)
    }

    /// Step forward one snapshot and return the scene it holds.
    ///
    /// A no-op returning `None` when already at the newest snapshot.
    pub fn redo(&mut self) -> Option<Scene> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.materialize(cursor + 1)
    }

    /// Check if a backward step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Check if a forward step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    /// Number of snapshots currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if the history holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }

    fn materialize(&self, index: usize) -> Option<Scene> {
        let json = self.snapshots.get(index)?;
        match SceneDocument::from_json(json).and_then(SceneDocument::into_scene) {
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::warn!(index, "Discarding unreadable history snapshot: {e}");
                None
            }
        }
    }
}
