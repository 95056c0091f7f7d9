//! The typed mutation stream consumed by the engine dispatcher.
//!
//! Every scene-mutating command is expressed as one [`Mutation`] value and
//! flows through a single choke point, which is what keeps history
//! snapshots and the persisted draft derived from the same edit stream.

use crate::{ObjectId, Scene, SceneObject};

/// A single scene mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Add an object on top of the scene (stroke commit, text placement,
    /// image insertion).
    AddObject {
        /// The object to add.
        object: SceneObject,
    },
    /// Replace the content of a text object.
    EditText {
        /// Target text object.
        id: ObjectId,
        /// New content.
        content: String,
    },
    /// Remove objects by ID.
    RemoveObjects {
        /// IDs to remove; unknown IDs are skipped.
        ids: Vec<ObjectId>,
    },
    /// Rotate and/or scale objects by a fixed delta.
    TransformObjects {
        /// IDs to transform; unknown IDs are skipped.
        ids: Vec<ObjectId>,
        /// Rotation delta in degrees.
        rotate_by: Option<f32>,
        /// Scale factor delta.
        scale_by: Option<f32>,
    },
    /// Remove every object from the scene.
    ClearScene,
}

impl Mutation {
    /// Short tag for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddObject { .. } => "add_object",
            Self::EditText { .. } => "edit_text",
            Self::RemoveObjects { .. } => "remove_objects",
            Self::TransformObjects { .. } => "transform_objects",
            Self::ClearScene => "clear_scene",
        }
    }

    /// Apply this mutation to a scene.
    ///
    /// Returns whether the scene actually changed; mutations referring only
    /// to unknown IDs are forgiving no-ops.
    pub fn apply_to(&self, scene: &mut Scene) -> bool {
        match self {
            Self::AddObject { object } => {
                scene.add_object(object.clone());
                true
            }
            Self::EditText { id, content } => {
                let Some(object) = scene.object_mut(*id) else {
                    return false;
                };
                match &mut object.kind {
                    crate::ObjectKind::Text {
                        content: existing, ..
                    } => {
                        *existing = content.clone();
                        true
                    }
                    _ => false,
                }
            }
            Self::RemoveObjects { ids } => scene.remove_objects(ids) > 0,
            Self::TransformObjects {
                ids,
                rotate_by,
                scale_by,
            } => {
                let mut changed = false;
                for id in ids {
                    changed |= scene.transform_object(*id, *rotate_by, *scale_by);
                }
                changed
            }
            Self::ClearScene => {
                if scene.is_empty() {
                    return false;
                }
                scene.clear();
                true
            }
        }
    }
}
