//! Scene objects - the building blocks of a journal page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Create a new unique object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single point on a freehand stroke path, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
}

impl PathPoint {
    /// Create a new path point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned text.
    #[default]
    Left,
    /// Centered text.
    Center,
    /// Right-aligned text.
    Right,
}

/// Drop-shadow applied to a text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadow {
    /// Shadow color as hex.
    pub color: String,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Horizontal offset in pixels.
    pub offset_x: f32,
    /// Vertical offset in pixels.
    pub offset_y: f32,
}

const fn default_true() -> bool {
    true
}

/// Interaction-state flags carried by every object.
///
/// These are exactly the properties guaranteed to survive serialization
/// round-trips; they are serialized under the rendering collaborator's
/// `camelCase` property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct InteractionFlags {
    /// Whether the object can be picked by selection tools.
    #[serde(default = "default_true")]
    pub selectable: bool,
    /// Whether transform handles are shown when selected.
    #[serde(default, rename = "hasControls")]
    pub has_controls: bool,
    /// Horizontal movement lock.
    #[serde(default, rename = "lockMovementX")]
    pub lock_movement_x: bool,
    /// Vertical movement lock.
    #[serde(default, rename = "lockMovementY")]
    pub lock_movement_y: bool,
    /// Rotation lock.
    #[serde(default, rename = "lockRotation")]
    pub lock_rotation: bool,
    /// Horizontal scaling lock.
    #[serde(default, rename = "lockScalingX")]
    pub lock_scaling_x: bool,
    /// Vertical scaling lock.
    #[serde(default, rename = "lockScalingY")]
    pub lock_scaling_y: bool,
    /// Whether inline editing is allowed (text objects).
    #[serde(default = "default_true")]
    pub editable: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self {
            selectable: true,
            has_controls: false,
            lock_movement_x: false,
            lock_movement_y: false,
            lock_rotation: false,
            lock_scaling_x: false,
            lock_scaling_y: false,
            editable: true,
        }
    }
}

/// The content a scene object carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ObjectKind {
    /// A freehand stroke. Rendered with round line caps and joins and no
    /// fill. Eraser strokes are ordinary strokes painted in the canvas
    /// background color.
    Stroke {
        /// Ordered path points in canvas coordinates.
        points: Vec<PathPoint>,
        /// Stroke color as hex.
        color: String,
        /// Stroke width in pixels.
        width: f32,
    },

    /// A block of text.
    Text {
        /// Text content.
        content: String,
        /// Font family name.
        font_family: String,
        /// Font size in pixels.
        font_size: f32,
        /// Fill color as hex.
        fill: String,
        /// Horizontal alignment.
        align: TextAlign,
        /// Bold flag.
        bold: bool,
        /// Italic flag.
        italic: bool,
        /// Underline flag.
        underline: bool,
        /// Background color painted behind the text for legibility.
        background: Option<String>,
        /// Optional drop shadow.
        shadow: Option<TextShadow>,
    },

    /// An imported image. The decoded pixel data is owned by the rendering
    /// collaborator; the scene only carries a reference to it.
    Image {
        /// Source reference (URI or data URL) resolving to the pixels.
        src: String,
        /// Natural width in pixels.
        natural_width: f32,
        /// Natural height in pixels.
        natural_height: f32,
    },
}

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from position and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized rectangle from two opposite corners.
    #[must_use]
    pub fn from_corners(a: PathPoint, b: PathPoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Check whether a point lies inside this rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Check whether two rectangles overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// A scene object with content, placement, and interaction flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique identifier.
    pub id: ObjectId,
    /// X position offset.
    pub x: f32,
    /// Y position offset.
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f32,
    /// Interaction-state flags.
    pub flags: InteractionFlags,
    /// Object content.
    pub kind: ObjectKind,
}

impl SceneObject {
    /// Create a new object with the given kind at the origin.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            flags: InteractionFlags::default(),
            kind,
        }
    }

    /// Set the position offset.
    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the interaction flags.
    #[must_use]
    pub fn with_flags(mut self, flags: InteractionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Axis-aligned bounding box of this object in canvas coordinates.
    ///
    /// Rotation is ignored; hit-testing and lasso selection work on the
    /// unrotated box. Text extent uses a fixed-metric estimate since real
    /// glyph measurement belongs to the rendering collaborator.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let (local_x, local_y, w, h) = match &self.kind {
            ObjectKind::Stroke {
                points, width: sw, ..
            } => {
                if points.is_empty() {
                    (0.0, 0.0, 0.0, 0.0)
                } else {
                    let mut min_x = f32::MAX;
                    let mut min_y = f32::MAX;
                    let mut max_x = f32::MIN;
                    let mut max_y = f32::MIN;
                    for p in points {
                        min_x = min_x.min(p.x);
                        min_y = min_y.min(p.y);
                        max_x = max_x.max(p.x);
                        max_y = max_y.max(p.y);
                    }
                    let half = sw / 2.0;
                    (
                        min_x - half,
                        min_y - half,
                        max_x - min_x + sw,
                        max_y - min_y + sw,
                    )
                }
            }
            ObjectKind::Text {
                content, font_size, ..
            } => {
                let longest = content.lines().map(str::len).max().unwrap_or(0);
                let line_count = content.lines().count().max(1);
                #[allow(clippy::cast_precision_loss)]
                let w = font_size * 0.6 * longest as f32;
                #[allow(clippy::cast_precision_loss)]
                let h = font_size * 1.2 * line_count as f32;
                (0.0, 0.0, w, h)
            }
            ObjectKind::Image {
                natural_width,
                natural_height,
                ..
            } => (0.0, 0.0, *natural_width, *natural_height),
        };
        Rect {
            x: self.x + local_x * self.scale_x,
            y: self.y + local_y * self.scale_y,
            width: w * self.scale_x,
            height: h * self.scale_y,
        }
    }

    /// Check if a point (in canvas coordinates) is within this object.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: Vec<PathPoint>, width: f32) -> SceneObject {
        SceneObject::new(ObjectKind::Stroke {
            points,
            color: "#000000".to_string(),
            width,
        })
    }

    #[test]
    fn test_object_id_round_trip() {
        let id = ObjectId::new();
        let parsed = ObjectId::parse(&id.to_string()).expect("valid uuid");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_object_id_parse_rejects_garbage() {
        assert!(ObjectId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_stroke_bounds_include_width() {
        let obj = stroke(
            vec![PathPoint::new(10.0, 10.0), PathPoint::new(20.0, 30.0)],
            4.0,
        );
        let b = obj.bounds();
        assert!((b.x - 8.0).abs() < f32::EPSILON);
        assert!((b.y - 8.0).abs() < f32::EPSILON);
        assert!((b.width - 14.0).abs() < f32::EPSILON);
        assert!((b.height - 24.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_stroke_has_zero_bounds() {
        let obj = stroke(Vec::new(), 2.0);
        let b = obj.bounds();
        assert!(b.width.abs() < f32::EPSILON);
        assert!(b.height.abs() < f32::EPSILON);
    }

    #[test]
    fn test_contains_point_respects_scale() {
        let mut obj = SceneObject::new(ObjectKind::Image {
            src: "mem://test".to_string(),
            natural_width: 100.0,
            natural_height: 50.0,
        })
        .with_position(10.0, 10.0);
        assert!(obj.contains_point(100.0, 50.0));
        assert!(!obj.contains_point(115.0, 50.0));

        obj.scale_x = 2.0;
        assert!(obj.contains_point(200.0, 50.0));
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = Rect::from_corners(PathPoint::new(50.0, 60.0), PathPoint::new(10.0, 20.0));
        assert!((r.x - 10.0).abs() < f32::EPSILON);
        assert!((r.y - 20.0).abs() < f32::EPSILON);
        assert!((r.width - 40.0).abs() < f32::EPSILON);
        assert!((r.height - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_default_flags() {
        let flags = InteractionFlags::default();
        assert!(flags.selectable);
        assert!(!flags.has_controls);
        assert!(flags.editable);
        assert!(!flags.lock_rotation);
    }
}
