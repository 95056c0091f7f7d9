//! Engine configuration.

use std::time::Duration;

use inkpad_core::{PenStyle, TextStyle};

/// Configuration for a new editing session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Canvas width in pixels, used when no draft is recovered.
    pub width: f32,
    /// Canvas height in pixels, used when no draft is recovered.
    pub height: f32,
    /// Canvas background color as hex.
    pub background: String,
    /// Quiescence window after the last mutation before the draft is
    /// written. Bursts of rapid edits coalesce into one write.
    pub debounce_window: Duration,
    /// Initial pen style.
    pub pen: PenStyle,
    /// Initial eraser width.
    pub eraser_width: f32,
    /// Initial text style.
    pub text: TextStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#ffffff".to_string(),
            debounce_window: Duration::from_secs(1),
            pen: PenStyle::default(),
            eraser_width: 12.0,
            text: TextStyle::default(),
        }
    }
}
