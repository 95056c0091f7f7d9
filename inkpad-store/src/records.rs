//! Persisted record shapes: draft slot, journal entries, view state.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use inkpad_core::SceneDocument;

/// A persisted draft: the auto-saved, in-progress scene not yet promoted
/// to an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    /// Document format version.
    pub version: String,
    /// When the draft was written, in milliseconds since the epoch.
    pub timestamp: u64,
    /// The serialized scene.
    pub canvas_data: SceneDocument,
    /// Names of the interaction-state properties carried by the scene
    /// document.
    pub allow_listed_props: Vec<String>,
}

/// What kind of content a journal entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A serialized scene from the drawing canvas.
    Drawing,
    /// A plain text entry.
    Text,
}

/// A permanent journal record.
///
/// Entries are append-only: immutable after creation except by explicit
/// deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Unique entry identifier.
    pub id: String,
    /// User-supplied title.
    pub title: String,
    /// Entry payload: a scene document string for drawings, the body text
    /// otherwise.
    pub content: String,
    /// Content kind.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Creation time in milliseconds since the epoch.
    pub created_at: u64,
    /// Last update time in milliseconds since the epoch.
    pub updated_at: u64,
    /// Always `false`; drafts live in their own slot.
    pub is_draft: bool,
}

/// The remembered presentation transform, persisted separately from any
/// scene content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Zoom factor.
    pub zoom: f32,
    /// Horizontal pan offset.
    pub pan_x: f32,
    /// Vertical pan offset.
    pub pan_y: f32,
}

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_shape() {
        let entry = JournalEntry {
            id: "abc".to_string(),
            title: "Morning pages".to_string(),
            content: "{}".to_string(),
            entry_type: EntryType::Drawing,
            created_at: 1000,
            updated_at: 1000,
            is_draft: false,
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("\"type\":\"drawing\""));
        assert!(json.contains("\"createdAt\":1000"));
        assert!(json.contains("\"isDraft\":false"));
    }

    #[test]
    fn test_draft_wire_shape() {
        let json = r##"{
            "version": "1.0",
            "timestamp": 42,
            "canvasData": {
                "version": "1.0",
                "width": 800.0,
                "height": 600.0,
                "background": "#ffffff",
                "objects": []
            },
            "allowListedProps": ["selectable"]
        }"##;
        let record: DraftRecord = serde_json::from_str(json).expect("parse");
        assert_eq!(record.timestamp, 42);
        assert_eq!(record.allow_listed_props, vec!["selectable"]);
    }

    #[test]
    fn test_timestamp_is_monotonic_enough() {
        let a = current_timestamp_ms();
        let b = current_timestamp_ms();
        assert!(b >= a);
        assert!(a > 0);
    }
}
