//! Zoom and pan transform applied to the rendering surface.

use serde::{Deserialize, Serialize};

/// Minimum zoom factor.
pub const MIN_ZOOM: f32 = 0.1;

/// Maximum zoom factor.
pub const MAX_ZOOM: f32 = 5.0;

/// The presentation transform: `screen = canvas * zoom + pan`.
///
/// Viewport state only affects how a scene is shown. It is never part of
/// the scene or its serialization; when the app wants to remember it, it
/// goes through a separate view-state record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// Create a viewport at 100% zoom with no pan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current horizontal pan offset.
    #[must_use]
    pub fn pan_x(&self) -> f32 {
        self.pan_x
    }

    /// Current vertical pan offset.
    #[must_use]
    pub fn pan_y(&self) -> f32 {
        self.pan_y
    }

    /// Zoom to an absolute factor, keeping the anchor point (in screen
    /// coordinates) visually stationary.
    ///
    /// Scaling from the origin instead would shift the content under the
    /// cursor, so the pan is adjusted to compensate. The factor is clamped
    /// to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_to(&mut self, factor: f32, anchor_x: f32, anchor_y: f32) {
        let target = factor.clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = target / self.zoom;
        self.pan_x = anchor_x - (anchor_x - self.pan_x) * ratio;
        self.pan_y = anchor_y - (anchor_y - self.pan_y) * ratio;
        self.zoom = target;
    }

    /// Zoom by a multiplicative step around the anchor point.
    pub fn zoom_by(&mut self, step: f32, anchor_x: f32, anchor_y: f32) {
        self.zoom_to(self.zoom * step, anchor_x, anchor_y);
    }

    /// Shift the view. Panning is unconstrained.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Restore a previously saved transform. Zoom is re-clamped in case
    /// the stored value predates the current limits.
    pub fn restore(&mut self, zoom: f32, pan_x: f32, pan_y: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }

    /// Reset to 100% zoom and no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Map a screen point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Map a canvas point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }
}
