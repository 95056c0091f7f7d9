//! Editing Session Integration Tests
//!
//! Exercises the engine façade end to end:
//! - Pointer-driven drawing and draft recovery
//! - Undo/redo over the mutation stream
//! - Debounced auto-save coalescing
//! - Entry promotion and draft lifecycle
//! - Image import through the async decode boundary

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use inkpad_core::{ObjectKind, PointerEvent, Tool};
use inkpad_engine::{
    DecodedImage, Engine, EngineConfig, EngineError, ImageDecoder,
};
use inkpad_store::{
    KvStore, MemoryStore, Persistence, StoreResult, DRAFT_KEY,
};

/// Store wrapper counting writes to the draft slot.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    draft_writes: AtomicUsize,
}

impl KvStore for CountingStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if key == DRAFT_KEY {
            self.draft_writes.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }
}

/// Decoder stub avoiding real image payloads in engine tests.
struct StubDecoder {
    fail: bool,
}

#[async_trait]
impl ImageDecoder for StubDecoder {
    async fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, EngineError> {
        if self.fail {
            Err(EngineError::ImageDecode("stub failure".to_string()))
        } else {
            Ok(DecodedImage {
                src: "mem://stub".to_string(),
                natural_width: 64.0,
                natural_height: 32.0,
            })
        }
    }
}

fn engine_over(store: Arc<MemoryStore>) -> Engine {
    Engine::new(EngineConfig::default(), Persistence::new(Box::new(store)))
}

/// Draw a three-point stroke through pointer events.
fn draw_stroke(engine: &mut Engine) {
    engine.pointer(PointerEvent::down(1.0, 1.0));
    engine.pointer(PointerEvent::moved(2.0, 2.0));
    engine.pointer(PointerEvent::up(3.0, 3.0));
}

// ============================================================================
// Drawing and Draft Recovery
// ============================================================================

#[test]
fn test_stroke_survives_draft_round_trip() {
    let store = Arc::new(MemoryStore::new());

    let mut engine = engine_over(store.clone());
    draw_stroke(&mut engine);
    assert_eq!(engine.scene().object_count(), 1);
    engine.flush_now().expect("flush");

    // A fresh engine over the same store recovers the draft.
    let restored = engine_over(store);
    assert_eq!(restored.scene().object_count(), 1);
    match &restored.scene().objects().next().expect("stroke").kind {
        ObjectKind::Stroke {
            points,
            color,
            width,
        } => {
            assert_eq!(points.len(), 3);
            assert_eq!(color, "#000000");
            assert!((width - 2.0).abs() < f32::EPSILON);
            assert!((points[0].x - 1.0).abs() < f32::EPSILON);
            assert!((points[2].y - 3.0).abs() < f32::EPSILON);
        }
        other => panic!("expected stroke, got {other:?}"),
    };
}

#[test]
fn test_corrupt_draft_starts_blank() {
    let store = Arc::new(MemoryStore::new());
    store.set(DRAFT_KEY, "{ definitely not a draft").expect("seed");

    let engine = engine_over(store);
    assert!(engine.scene().is_empty());
    assert!((engine.scene().width() - 800.0).abs() < f32::EPSILON);
}

#[test]
fn test_clearing_the_page_deletes_the_draft() {
    let store = Arc::new(MemoryStore::new());

    let mut engine = engine_over(store.clone());
    draw_stroke(&mut engine);
    engine.flush_now().expect("flush");
    assert!(store.get(DRAFT_KEY).expect("read").is_some());

    engine.clear_scene();
    engine.flush_now().expect("flush");
    assert!(
        store.get(DRAFT_KEY).expect("read").is_none(),
        "an empty page must delete the slot, not write a blank draft"
    );
}

// ============================================================================
// Undo / Redo
// ============================================================================

#[test]
fn test_text_undo_redo() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    engine.add_text("hello", None);
    assert_eq!(engine.scene().object_count(), 1);

    assert!(engine.undo());
    assert_eq!(engine.scene().object_count(), 0);

    assert!(engine.redo());
    assert_eq!(engine.scene().object_count(), 1);
    match &engine.scene().objects().next().expect("text").kind {
        ObjectKind::Text { content, .. } => assert_eq!(content, "hello"),
        other => panic!("expected text, got {other:?}"),
    };
}

#[test]
fn test_undo_stops_at_session_baseline() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    engine.add_text("one", None);
    engine.add_text("two", None);

    assert!(engine.undo());
    assert!(engine.undo());
    assert!(engine.scene().is_empty());
    assert!(!engine.undo(), "baseline is never popped");
}

#[test]
fn test_new_edit_discards_redo() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    engine.add_text("first", None);
    engine.undo();
    assert!(engine.can_redo());

    engine.add_text("second", None);
    assert!(!engine.can_redo());
}

#[test]
fn test_noop_commands_do_not_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    engine.add_text("anchor", None);
    assert_eq!(engine.delete_selection(), 0, "no selection, nothing removed");
    assert!(!engine.rotate_selection_cw());
    assert!(!engine.grow_selection());

    // One undo lands back on the baseline; the no-ops added no snapshots.
    assert!(engine.undo());
    assert!(engine.scene().is_empty());
    assert!(!engine.can_undo());
}

// ============================================================================
// Auto-save Debounce
// ============================================================================

#[test]
fn test_rapid_edits_coalesce_into_one_save() {
    let store = Arc::new(CountingStore::default());
    let mut engine = Engine::new(
        EngineConfig::default(),
        Persistence::new(Box::new(store.clone())),
    );

    for i in 0..5 {
        engine.add_text(format!("burst {i}"), None);
    }
    assert!(engine.has_pending_save());

    // Inside the quiescence window nothing fires.
    assert!(!engine.tick(Instant::now()).expect("tick"));
    assert_eq!(store.draft_writes.load(Ordering::SeqCst), 0);

    // Past the window exactly one write fires.
    let later = Instant::now() + Duration::from_secs(5);
    assert!(engine.tick(later).expect("tick"));
    assert_eq!(store.draft_writes.load(Ordering::SeqCst), 1);

    // The deadline is consumed.
    assert!(!engine.tick(later + Duration::from_secs(5)).expect("tick"));
    assert_eq!(store.draft_writes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_autosave_reports_without_losing_the_scene() {
    // Quota too small for any draft write.
    let store = MemoryStore::with_quota(10);
    let mut engine = Engine::new(
        EngineConfig::default(),
        Persistence::new(Box::new(store)),
    );

    engine.add_text("too big to store", None);
    let result = engine.tick(Instant::now() + Duration::from_secs(5));
    assert!(matches!(result, Err(EngineError::Store(_))));

    // The in-memory scene stays authoritative.
    assert_eq!(engine.scene().object_count(), 1);
}

// ============================================================================
// Entry Promotion
// ============================================================================

#[test]
fn test_save_entry_clears_draft_and_pending_save() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store.clone());

    draw_stroke(&mut engine);
    engine.flush_now().expect("flush");
    assert!(store.get(DRAFT_KEY).expect("read").is_some());

    // Another edit arms the debounce before we promote.
    engine.add_text("note", None);
    assert!(engine.has_pending_save());

    let entry = engine.save_entry("Tuesday sketch").expect("promote");
    assert_eq!(entry.title, "Tuesday sketch");
    assert!(store.get(DRAFT_KEY).expect("read").is_none());

    // The stale timer must not resurrect the cleared draft.
    assert!(!engine
        .tick(Instant::now() + Duration::from_secs(60))
        .expect("tick"));
    assert!(store.get(DRAFT_KEY).expect("read").is_none());
}

// ============================================================================
// Image Import
// ============================================================================

#[tokio::test]
async fn test_image_import_inserts_after_full_decode() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = Engine::with_decoder(
        EngineConfig::default(),
        Persistence::new(Box::new(store)),
        Box::new(StubDecoder { fail: false }),
    );

    let id = engine.import_image(b"whatever").await.expect("import");
    let object = engine.scene().object(id).expect("inserted");
    match &object.kind {
        ObjectKind::Image {
            src,
            natural_width,
            natural_height,
        } => {
            assert_eq!(src, "mem://stub");
            assert!((natural_width - 64.0).abs() < f32::EPSILON);
            assert!((natural_height - 32.0).abs() < f32::EPSILON);
        }
        other => panic!("expected image, got {other:?}"),
    }
    assert!(engine.can_undo());
}

#[tokio::test]
async fn test_failed_decode_adds_no_partial_object() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = Engine::with_decoder(
        EngineConfig::default(),
        Persistence::new(Box::new(store)),
        Box::new(StubDecoder { fail: true }),
    );

    let result = engine.import_image(b"whatever").await;
    assert!(matches!(result, Err(EngineError::ImageDecode(_))));
    assert!(engine.scene().is_empty());
    assert!(!engine.can_undo());
    assert!(!engine.has_pending_save());
}

// ============================================================================
// Tools and Selection
// ============================================================================

#[test]
fn test_lasso_select_then_delete() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    draw_stroke(&mut engine);
    engine.set_tool(Tool::Lasso);
    engine.pointer(PointerEvent::down(0.0, 0.0));
    engine.pointer(PointerEvent::moved(50.0, 50.0));
    engine.pointer(PointerEvent::up(50.0, 50.0));
    assert!(engine.scene().has_selection());

    assert_eq!(engine.delete_selection(), 1);
    assert!(engine.scene().is_empty());
}

#[test]
fn test_eraser_draws_in_page_background() {
    let store = Arc::new(MemoryStore::new());
    let config = EngineConfig {
        background: "#fdf6e3".to_string(),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Persistence::new(Box::new(store)));

    engine.set_tool(Tool::Eraser);
    draw_stroke(&mut engine);

    match &engine.scene().objects().next().expect("stroke").kind {
        ObjectKind::Stroke { color, .. } => assert_eq!(color, "#fdf6e3"),
        other => panic!("expected stroke, got {other:?}"),
    };
}

#[test]
fn test_text_placement_enters_inline_edit() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    engine.set_tool(Tool::Text);
    engine.pointer(PointerEvent::down(120.0, 80.0));

    let id = engine.editing_text().expect("editing after placement");
    assert_eq!(engine.scene().object_count(), 1);

    let committed = engine.commit_text_edit("written later").expect("commit");
    assert_eq!(committed, id);
    assert!(engine.editing_text().is_none());
    match &engine.scene().object(id).expect("exists").kind {
        ObjectKind::Text { content, .. } => assert_eq!(content, "written later"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_selection_transforms_apply_fixed_steps() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    draw_stroke(&mut engine);
    engine.set_tool(Tool::Lasso);
    engine.pointer(PointerEvent::down(0.0, 0.0));
    engine.pointer(PointerEvent::up(50.0, 50.0));

    assert!(engine.rotate_selection_cw());
    assert!(engine.grow_selection());

    let object = engine.scene().objects().next().expect("stroke");
    assert!((object.rotation - 90.0).abs() < f32::EPSILON);
    assert!((object.scale_x - 1.1).abs() < f32::EPSILON);
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_pointer_events_map_through_zoom() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_over(store);

    // Zoom anchored at the origin doubles screen coordinates.
    engine.zoom_to(2.0, 0.0, 0.0);
    engine.pointer(PointerEvent::down(100.0, 100.0));
    engine.pointer(PointerEvent::up(120.0, 100.0));

    match &engine.scene().objects().next().expect("stroke").kind {
        ObjectKind::Stroke { points, .. } => {
            assert!((points[0].x - 50.0).abs() < 1e-4);
            assert!((points[0].y - 50.0).abs() < 1e-4);
        }
        other => panic!("expected stroke, got {other:?}"),
    };
}

// ============================================================================
// File-backed Sessions
// ============================================================================

#[test]
fn test_file_backed_session_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut engine = Engine::new(
            EngineConfig::default(),
            Persistence::with_data_dir(dir.path()).expect("store"),
        );
        draw_stroke(&mut engine);
        engine.flush_now().expect("flush");
    }

    let engine = Engine::new(
        EngineConfig::default(),
        Persistence::with_data_dir(dir.path()).expect("store"),
    );
    assert_eq!(engine.scene().object_count(), 1);
}

#[test]
fn test_view_state_survives_restart() {
    let store = Arc::new(MemoryStore::new());

    let mut engine = engine_over(store.clone());
    engine.zoom_to(1.5, 200.0, 150.0);
    engine.pan_by(30.0, -10.0);
    let saved = (
        engine.viewport().zoom(),
        engine.viewport().pan_x(),
        engine.viewport().pan_y(),
    );
    engine.save_view_state().expect("save view");

    let restored = engine_over(store);
    assert!((restored.viewport().zoom() - saved.0).abs() < 1e-4);
    assert!((restored.viewport().pan_x() - saved.1).abs() < 1e-4);
    assert!((restored.viewport().pan_y() - saved.2).abs() < 1e-4);
}
