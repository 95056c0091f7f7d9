//! Canonical serialized representation for scenes.
//!
//! Documents produced here are what the persistence layer writes to the
//! draft slot and entry records, and what history snapshots contain. The
//! format tracks the rendering collaborator's own JSON import/export,
//! extended with a fixed allow-list of interaction-state properties.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, InteractionFlags, ObjectId, ObjectKind, Scene, SceneObject};

/// Current scene document format version.
pub const SCENE_DOCUMENT_VERSION: &str = "1.0";

/// Interaction-state properties guaranteed to survive round-trips.
pub const ALLOW_LISTED_PROPS: [&str; 8] = [
    "selectable",
    "hasControls",
    "lockMovementX",
    "lockMovementY",
    "lockRotation",
    "lockScalingX",
    "lockScalingY",
    "editable",
];

/// Document-friendly object description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDocument {
    /// Object identifier.
    pub id: String,
    /// X position offset.
    pub x: f32,
    /// Y position offset.
    pub y: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Horizontal scale factor.
    #[serde(default = "ObjectDocument::default_scale")]
    pub scale_x: f32,
    /// Vertical scale factor.
    #[serde(default = "ObjectDocument::default_scale")]
    pub scale_y: f32,
    /// Opacity in `[0.0, 1.0]`.
    #[serde(default = "ObjectDocument::default_opacity")]
    pub opacity: f32,
    /// Allow-listed interaction flags, flattened into the object record.
    #[serde(flatten)]
    pub flags: InteractionFlags,
    /// Object content.
    pub kind: ObjectKind,
}

impl From<&SceneObject> for ObjectDocument {
    fn from(object: &SceneObject) -> Self {
        Self {
            id: object.id.to_string(),
            x: object.x,
            y: object.y,
            rotation: object.rotation,
            scale_x: object.scale_x,
            scale_y: object.scale_y,
            opacity: object.opacity,
            flags: object.flags,
            kind: object.kind.clone(),
        }
    }
}

impl ObjectDocument {
    const fn default_scale() -> f32 {
        1.0
    }

    const fn default_opacity() -> f32 {
        1.0
    }

    /// Convert document to runtime object.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::CorruptDocument`] if the object id is not a
    /// valid UUID.
    pub fn into_object(self) -> CanvasResult<SceneObject> {
        let id = ObjectId::parse(&self.id)
            .map_err(|e| CanvasError::CorruptDocument(format!("invalid object id: {e}")))?;
        let mut object = SceneObject::new(self.kind)
            .with_position(self.x, self.y)
            .with_flags(self.flags)
            .with_opacity(self.opacity);
        object.id = id;
        object.rotation = self.rotation;
        object.scale_x = self.scale_x;
        object.scale_y = self.scale_y;
        Ok(object)
    }
}

/// Canonical scene document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Document format version.
    pub version: String,
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Background color as hex.
    pub background: String,
    /// Objects in z-order (bottom first).
    pub objects: Vec<ObjectDocument>,
}

impl SceneDocument {
    /// Build a document from a runtime scene.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            version: SCENE_DOCUMENT_VERSION.to_string(),
            width: scene.width(),
            height: scene.height(),
            background: scene.background().to_string(),
            objects: scene.objects().map(ObjectDocument::from).collect(),
        }
    }

    /// Materialize this document into a runtime scene.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnsupportedVersion`] for a document written
    /// by an incompatible format, and [`CanvasError::CorruptDocument`] if
    /// any object cannot be reconstructed.
    pub fn into_scene(self) -> CanvasResult<Scene> {
        if !self.version.starts_with("1.") {
            return Err(CanvasError::UnsupportedVersion(self.version));
        }
        let mut scene = Scene::new(self.width, self.height, self.background);
        for object_doc in self.objects {
            let object = object_doc.into_object()?;
            scene.add_object(object);
        }
        Ok(scene)
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Parse a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::CorruptDocument`] if the payload is not a
    /// valid scene document.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(|e| CanvasError::CorruptDocument(e.to_string()))
    }
}
