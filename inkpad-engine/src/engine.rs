//! The engine façade: one owner for scene, history, tools, viewport, and
//! persistence.

use std::time::Instant;

use inkpad_core::{
    History, Mutation, ObjectId, ObjectKind, PointerEvent, Scene, SceneObject, Tool, ToolAction,
    ToolController, Viewport,
};
use inkpad_store::{JournalEntry, Persistence, ViewState};

use crate::{EngineConfig, EngineResult, ImageDecoder, RasterDecoder, SaveDebouncer};

/// Rotation applied per transform invocation, in degrees.
const ROTATE_STEP_DEG: f32 = 90.0;

/// Scale factor delta applied per transform invocation.
const SCALE_STEP: f32 = 0.1;

/// The editing engine for one journal page.
///
/// Every mutating command funnels through [`Engine::apply`], which pushes
/// a history snapshot and arms the debounced draft save in that order.
/// Selection and viewport changes are presentation state and bypass both.
pub struct Engine {
    config: EngineConfig,
    scene: Scene,
    history: History,
    tools: ToolController,
    viewport: Viewport,
    persistence: Persistence,
    debounce: SaveDebouncer,
    decoder: Box<dyn ImageDecoder>,
}

impl Engine {
    /// Create an engine with the default raster image decoder.
    ///
    /// If the draft slot holds a usable scene it is recovered; otherwise a
    /// blank canvas with the configured size and background is created.
    /// The recovered (or blank) state becomes the baseline history
    /// snapshot, so undo never walks past session start.
    #[must_use]
    pub fn new(config: EngineConfig, persistence: Persistence) -> Self {
        Self::with_decoder(config, persistence, Box::new(RasterDecoder::new()))
    }

    /// Create an engine with a custom image decoder.
    #[must_use]
    pub fn with_decoder(
        config: EngineConfig,
        persistence: Persistence,
        decoder: Box<dyn ImageDecoder>,
    ) -> Self {
        let scene = persistence.load_draft().unwrap_or_else(|| {
            tracing::debug!("No usable draft, starting a blank page");
            Scene::new(config.width, config.height, config.background.clone())
        });

        let mut viewport = Viewport::new();
        if let Some(view) = persistence.load_view_state() {
            viewport.restore(view.zoom, view.pan_x, view.pan_y);
        }

        let tools = ToolController::new(scene.background())
            .with_pen(config.pen.clone())
            .with_eraser_width(config.eraser_width)
            .with_text_style(config.text.clone());

        let mut history = History::new();
        history.push(&scene);

        let debounce = SaveDebouncer::new(config.debounce_window);

        Self {
            config,
            scene,
            history,
            tools,
            viewport,
            persistence,
            debounce,
            decoder,
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Apply one mutation to the scene.
    ///
    /// Returns whether the scene changed. A changed scene gets a history
    /// snapshot and (re)arms the debounced draft save; forgiving no-ops
    /// (unknown IDs, empty clears) do neither.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        let changed = mutation.apply_to(&mut self.scene);
        if changed {
            tracing::debug!(kind = mutation.kind(), "Mutation applied");
            self.history.push(&self.scene);
            self.debounce.arm(Instant::now());
        }
        changed
    }

    fn process_action(&mut self, action: ToolAction) {
        match action {
            ToolAction::Commit(mutation) => {
                self.apply(&mutation);
            }
            ToolAction::SetSelection(region) => {
                let count = self.scene.select_region(&region);
                tracing::debug!(count, "Lasso selection");
            }
            ToolAction::ClearSelection => self.scene.deselect_all(),
            ToolAction::PlaceText { x, y } => {
                let object = self.tools.make_text_object("", x, y);
                let id = object.id;
                self.apply(&Mutation::AddObject { object });
                self.tools.begin_text_edit(id);
            }
        }
    }

    /// Route a pointer event (in screen coordinates) through the active
    /// tool.
    pub fn pointer(&mut self, event: PointerEvent) {
        let (x, y) = self.viewport.screen_to_canvas(event.x, event.y);
        let canvas_event = PointerEvent {
            phase: event.phase,
            x,
            y,
        };
        let actions = self.tools.handle_pointer(canvas_event);
        for action in actions {
            self.process_action(action);
        }
    }

    // -----------------------------------------------------------------------
    // Tool surface
    // -----------------------------------------------------------------------

    /// The active tool.
    #[must_use]
    pub fn active_tool(&self) -> Tool {
        self.tools.active()
    }

    /// Activate a tool, committing any in-progress stroke first.
    pub fn set_tool(&mut self, tool: Tool) {
        if let Some(action) = self.tools.set_tool(tool) {
            self.process_action(action);
        }
    }

    /// Set the pen color. Implicitly activates the pen.
    pub fn set_pen_color(&mut self, color: impl Into<String>) {
        if let Some(action) = self.tools.set_pen_color(color) {
            self.process_action(action);
        }
    }

    /// Set the pen width.
    pub fn set_pen_width(&mut self, width: f32) {
        self.tools.set_pen_width(width);
    }

    /// Set the eraser width.
    pub fn set_eraser_width(&mut self, width: f32) {
        self.tools.set_eraser_width(width);
    }

    /// The text object currently in inline editing, if any.
    #[must_use]
    pub fn editing_text(&self) -> Option<ObjectId> {
        self.tools.editing_text()
    }

    /// Commit the content of the text object being edited and leave the
    /// inline-edit sub-state.
    ///
    /// Returns the edited object, or `None` when no edit was in progress.
    pub fn commit_text_edit(&mut self, content: impl Into<String>) -> Option<ObjectId> {
        let id = self.tools.finish_text_edit()?;
        self.apply(&Mutation::EditText {
            id,
            content: content.into(),
        });
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Object commands
    // -----------------------------------------------------------------------

    /// Add a text block with the current text style.
    ///
    /// Placed at `at` in canvas coordinates, or at the canvas center when
    /// no point is given.
    pub fn add_text(&mut self, content: impl Into<String>, at: Option<(f32, f32)>) -> ObjectId {
        let (x, y) =
            at.unwrap_or_else(|| (self.scene.width() / 2.0, self.scene.height() / 2.0));
        let object = self.tools.make_text_object(content, x, y);
        let id = object.id;
        self.apply(&Mutation::AddObject { object });
        id
    }

    /// Decode and insert an image.
    ///
    /// The decode completes in full before the scene is touched; a decode
    /// failure aborts the import with no partial object.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::ImageDecode`] for undecodable data.
    pub async fn import_image(&mut self, bytes: &[u8]) -> EngineResult<ObjectId> {
        let decoded = self.decoder.decode(bytes).await?;
        let object = SceneObject::new(ObjectKind::Image {
            src: decoded.src,
            natural_width: decoded.natural_width,
            natural_height: decoded.natural_height,
        });
        let id = object.id;
        self.apply(&Mutation::AddObject { object });
        Ok(id)
    }

    /// Delete the current selection. A no-op without a selection.
    ///
    /// Returns the number of objects removed.
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.scene.selected_ids().to_vec();
        if ids.is_empty() {
            tracing::debug!("Delete with no selection ignored");
            return 0;
        }
        let count = ids.len();
        self.apply(&Mutation::RemoveObjects { ids });
        count
    }

    /// Rotate the selection a quarter turn clockwise. A no-op without a
    /// selection.
    pub fn rotate_selection_cw(&mut self) -> bool {
        self.transform_selection(Some(ROTATE_STEP_DEG), None)
    }

    /// Rotate the selection a quarter turn counter-clockwise. A no-op
    /// without a selection.
    pub fn rotate_selection_ccw(&mut self) -> bool {
        self.transform_selection(Some(-ROTATE_STEP_DEG), None)
    }

    /// Grow the selection by one scale step. A no-op without a selection.
    pub fn grow_selection(&mut self) -> bool {
        self.transform_selection(None, Some(SCALE_STEP))
    }

    /// Shrink the selection by one scale step. A no-op without a
    /// selection.
    pub fn shrink_selection(&mut self) -> bool {
        self.transform_selection(None, Some(-SCALE_STEP))
    }

    fn transform_selection(&mut self, rotate_by: Option<f32>, scale_by: Option<f32>) -> bool {
        let ids = self.scene.selected_ids().to_vec();
        if ids.is_empty() {
            tracing::debug!("Transform with no selection ignored");
            return false;
        }
        self.apply(&Mutation::TransformObjects {
            ids,
            rotate_by,
            scale_by,
        })
    }

    /// Remove every object from the scene.
    pub fn clear_scene(&mut self) {
        self.apply(&Mutation::ClearScene);
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step the scene back one snapshot.
    ///
    /// The restored scene becomes the new auto-save target, so the draft
    /// follows the undo rather than diverging from it.
    pub fn undo(&mut self) -> bool {
        let Some(mut scene) = self.history.undo() else {
            return false;
        };
        scene.deselect_all();
        self.scene = scene;
        self.debounce.arm(Instant::now());
        true
    }

    /// Step the scene forward one snapshot.
    pub fn redo(&mut self) -> bool {
        let Some(mut scene) = self.history.redo() else {
            return false;
        };
        scene.deselect_all();
        self.scene = scene;
        self.debounce.arm(Instant::now());
        true
    }

    /// Check if an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Drive the debounced auto-save from the host's event loop.
    ///
    /// Returns `Ok(true)` when a draft write fired, `Ok(false)` when
    /// nothing was due. A failed write surfaces the error but leaves the
    /// in-memory scene authoritative; editing continues.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Store`] when the due save fails.
    pub fn tick(&mut self, now: Instant) -> EngineResult<bool> {
        if !self.debounce.take_due(now) {
            return Ok(false);
        }
        match self.persistence.save_draft(&self.scene) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("Draft auto-save failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Write the draft immediately, cancelling any pending deadline.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Store`] when the write fails.
    pub fn flush_now(&mut self) -> EngineResult<()> {
        self.debounce.cancel();
        self.persistence.save_draft(&self.scene)?;
        Ok(())
    }

    /// Check whether an auto-save is pending.
    #[must_use]
    pub fn has_pending_save(&self) -> bool {
        self.debounce.is_armed()
    }

    /// Promote the scene to a permanent journal entry.
    ///
    /// The draft slot is cleared by the promotion, and the pending
    /// auto-save deadline is dropped so a stale timer cannot resurrect
    /// the cleared draft.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Store`] when the entry cannot be
    /// written; the draft slot is left intact in that case.
    pub fn save_entry(&mut self, title: &str) -> EngineResult<JournalEntry> {
        let entry = self.persistence.promote_to_entry(&self.scene, title)?;
        self.debounce.cancel();
        Ok(entry)
    }

    /// Discard the draft slot and any pending auto-save.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Store`] when the removal fails.
    pub fn discard_draft(&mut self) -> EngineResult<()> {
        self.persistence.discard_draft()?;
        self.debounce.cancel();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    /// The presentation transform.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Zoom to an absolute factor around a screen-space anchor.
    pub fn zoom_to(&mut self, factor: f32, anchor_x: f32, anchor_y: f32) {
        self.viewport.zoom_to(factor, anchor_x, anchor_y);
    }

    /// Zoom by a multiplicative step around a screen-space anchor.
    pub fn zoom_by(&mut self, step: f32, anchor_x: f32, anchor_y: f32) {
        self.viewport.zoom_by(step, anchor_x, anchor_y);
    }

    /// Shift the view.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_by(dx, dy);
    }

    /// Persist the current presentation transform.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Store`] when the write fails.
    pub fn save_view_state(&self) -> EngineResult<()> {
        self.persistence.save_view_state(ViewState {
            zoom: self.viewport.zoom(),
            pan_x: self.viewport.pan_x(),
            pan_y: self.viewport.pan_y(),
        })?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The live scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The persistence layer, for entry browsing outside the editing flow.
    #[must_use]
    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
