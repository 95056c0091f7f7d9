//! Tool state machine: routes pointer input by active editing mode.

use serde::{Deserialize, Serialize};

use crate::{
    Mutation, ObjectId, ObjectKind, PathPoint, PointerEvent, PointerPhase, Rect, SceneObject,
    TextAlign, TextShadow,
};

/// Lasso drags smaller than this (in both axes) count as a plain click,
/// which clears the selection instead of selecting a sliver.
const LASSO_CLICK_TOLERANCE: f32 = 2.0;

/// The active editing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand drawing with the active pen style.
    #[default]
    Pen,
    /// Freehand drawing in the canvas background color. This paints over
    /// content rather than deleting it, so erasing across an image or a
    /// differently-colored region leaves a visible patch; that matches the
    /// shipped app and is intentional.
    Eraser,
    /// Click to place a text block, then edit it inline.
    Text,
    /// Drag a region to select the objects it touches.
    Lasso,
    /// Apply fixed rotate/scale steps to the current selection.
    Transform,
}

/// Pen color and width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenStyle {
    /// Stroke color as hex.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for PenStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 2.0,
        }
    }
}

/// Style applied to newly placed text blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Fill color as hex.
    pub fill: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
    /// Background painted behind the text while editing, for legibility.
    pub background: Option<String>,
    /// Optional drop shadow.
    pub shadow: Option<TextShadow>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Georgia".to_string(),
            font_size: 18.0,
            fill: "#1a1a1a".to_string(),
            align: TextAlign::Left,
            bold: false,
            italic: false,
            underline: false,
            background: Some("#ffffff".to_string()),
            shadow: None,
        }
    }
}

/// Outcome of routing one input through the tool state machine.
///
/// Only `Commit` carries a scene mutation (and therefore a history
/// snapshot and an auto-save); selection changes are presentation state
/// and bypass both.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// A scene mutation ready for the dispatcher.
    Commit(Mutation),
    /// Replace the selection with objects intersecting the region.
    SetSelection(Rect),
    /// Clear the selection.
    ClearSelection,
    /// Place a new text block at the given canvas point and begin inline
    /// editing.
    PlaceText {
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
    },
}

/// An in-progress freehand stroke.
#[derive(Debug, Clone)]
struct StrokeDraft {
    points: Vec<PathPoint>,
    color: String,
    width: f32,
}

/// Routes pointer input according to the active tool and holds the
/// per-tool styling state.
///
/// Transitions between tools are explicit, with one exception: picking a
/// pen color while a non-pen tool is active switches back to [`Tool::Pen`],
/// since choosing a color is an intent to draw. Switching tools mid-drag
/// commits the in-progress stroke as-is.
#[derive(Debug)]
pub struct ToolController {
    active: Tool,
    pen: PenStyle,
    eraser_width: f32,
    text: TextStyle,
    /// Canvas background color; eraser strokes paint in this.
    background: String,
    draft: Option<StrokeDraft>,
    lasso_start: Option<PathPoint>,
    lasso_end: Option<PathPoint>,
    editing: Option<ObjectId>,
}

impl ToolController {
    /// Create a controller for a canvas with the given background color.
    #[must_use]
    pub fn new(background: impl Into<String>) -> Self {
        Self {
            active: Tool::default(),
            pen: PenStyle::default(),
            eraser_width: 12.0,
            text: TextStyle::default(),
            background: background.into(),
            draft: None,
            lasso_start: None,
            lasso_end: None,
            editing: None,
        }
    }

    /// Set the initial pen style.
    #[must_use]
    pub fn with_pen(mut self, pen: PenStyle) -> Self {
        self.pen = pen;
        self
    }

    /// Set the initial eraser width.
    #[must_use]
    pub fn with_eraser_width(mut self, width: f32) -> Self {
        self.eraser_width = width;
        self
    }

    /// Set the initial text style.
    #[must_use]
    pub fn with_text_style(mut self, text: TextStyle) -> Self {
        self.text = text;
        self
    }

    /// The active tool.
    #[must_use]
    pub fn active(&self) -> Tool {
        self.active
    }

    /// The current pen style.
    #[must_use]
    pub fn pen(&self) -> &PenStyle {
        &self.pen
    }

    /// The current text style.
    #[must_use]
    pub fn text_style(&self) -> &TextStyle {
        &self.text
    }

    /// Mutable access to the text style (toolbar toggles).
    pub fn text_style_mut(&mut self) -> &mut TextStyle {
        &mut self.text
    }

    /// Activate a tool.
    ///
    /// An in-progress stroke is committed as-is before the new tool takes
    /// over, and any inline text edit ends.
    pub fn set_tool(&mut self, tool: Tool) -> Option<ToolAction> {
        let pending = self.take_draft_commit();
        if self.active != tool {
            tracing::debug!(from = ?self.active, to = ?tool, "Tool switch");
        }
        self.active = tool;
        self.lasso_start = None;
        self.lasso_end = None;
        self.editing = None;
        pending
    }

    /// Set the pen color.
    ///
    /// Selecting a color while a non-pen tool is active implicitly
    /// activates the pen.
    pub fn set_pen_color(&mut self, color: impl Into<String>) -> Option<ToolAction> {
        self.pen.color = color.into();
        if self.active == Tool::Pen {
            None
        } else {
            self.set_tool(Tool::Pen)
        }
    }

    /// Set the pen width.
    pub fn set_pen_width(&mut self, width: f32) {
        self.pen.width = width;
    }

    /// Set the eraser width, independent of the pen width.
    pub fn set_eraser_width(&mut self, width: f32) {
        self.eraser_width = width;
    }

    /// The text object currently being edited inline, if any.
    #[must_use]
    pub fn editing_text(&self) -> Option<ObjectId> {
        self.editing
    }

    /// Enter the inline-edit sub-state for a placed text object.
    pub fn begin_text_edit(&mut self, id: ObjectId) {
        self.editing = Some(id);
    }

    /// Leave the inline-edit sub-state.
    ///
    /// Returns the object that was being edited.
    pub fn finish_text_edit(&mut self) -> Option<ObjectId> {
        self.editing.take()
    }

    /// Route a pointer event through the active tool.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<ToolAction> {
        match self.active {
            Tool::Pen => self.handle_draw(event, false),
            Tool::Eraser => self.handle_draw(event, true),
            Tool::Text => Self::handle_text(event),
            Tool::Lasso => self.handle_lasso(event),
            // Transform operates on the selection through explicit
            // rotate/scale commands, not pointer drags.
            Tool::Transform => Vec::new(),
        }
    }

    fn handle_draw(&mut self, event: PointerEvent, eraser: bool) -> Vec<ToolAction> {
        match event.phase {
            PointerPhase::Down => {
                let mut actions = Vec::new();
                if let Some(commit) = self.take_draft_commit() {
                    actions.push(commit);
                }
                let (color, width) = if eraser {
                    (self.background.clone(), self.eraser_width)
                } else {
                    (self.pen.color.clone(), self.pen.width)
                };
                self.draft = Some(StrokeDraft {
                    points: vec![PathPoint::new(event.x, event.y)],
                    color,
                    width,
                });
                actions
            }
            PointerPhase::Move => {
                if let Some(draft) = &mut self.draft {
                    draft.points.push(PathPoint::new(event.x, event.y));
                }
                Vec::new()
            }
            PointerPhase::Up => {
                if let Some(draft) = &mut self.draft {
                    draft.points.push(PathPoint::new(event.x, event.y));
                }
                self.take_draft_commit().into_iter().collect()
            }
        }
    }

    fn handle_text(event: PointerEvent) -> Vec<ToolAction> {
        match event.phase {
            PointerPhase::Down => vec![ToolAction::PlaceText {
                x: event.x,
                y: event.y,
            }],
            _ => Vec::new(),
        }
    }

    fn handle_lasso(&mut self, event: PointerEvent) -> Vec<ToolAction> {
        match event.phase {
            PointerPhase::Down => {
                self.lasso_start = Some(PathPoint::new(event.x, event.y));
                self.lasso_end = self.lasso_start;
                Vec::new()
            }
            PointerPhase::Move => {
                if self.lasso_start.is_some() {
                    self.lasso_end = Some(PathPoint::new(event.x, event.y));
                }
                Vec::new()
            }
            PointerPhase::Up => {
                let (Some(start), Some(_)) = (self.lasso_start.take(), self.lasso_end.take())
                else {
                    return Vec::new();
                };
                let region = Rect::from_corners(start, PathPoint::new(event.x, event.y));
                if region.width < LASSO_CLICK_TOLERANCE && region.height < LASSO_CLICK_TOLERANCE {
                    vec![ToolAction::ClearSelection]
                } else {
                    vec![ToolAction::SetSelection(region)]
                }
            }
        }
    }

    /// Build a text object at the given point using the current style.
    #[must_use]
    pub fn make_text_object(&self, content: impl Into<String>, x: f32, y: f32) -> SceneObject {
        SceneObject::new(ObjectKind::Text {
            content: content.into(),
            font_family: self.text.font_family.clone(),
            font_size: self.text.font_size,
            fill: self.text.fill.clone(),
            align: self.text.align,
            bold: self.text.bold,
            italic: self.text.italic,
            underline: self.text.underline,
            background: self.text.background.clone(),
            shadow: self.text.shadow.clone(),
        })
        .with_position(x, y)
    }

    fn take_draft_commit(&mut self) -> Option<ToolAction> {
        let draft = self.draft.take()?;
        if draft.points.is_empty() {
            return None;
        }
        let mut object = SceneObject::new(ObjectKind::Stroke {
            points: draft.points,
            color: draft.color,
            width: draft.width,
        });
        // Strokes are drawn content, not moveable widgets.
        object.flags.has_controls = false;
        Some(ToolAction::Commit(Mutation::AddObject { object }))
    }
}
