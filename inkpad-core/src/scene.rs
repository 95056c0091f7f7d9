//! Scene model for one journal page.

use serde::{Deserialize, Serialize};

use crate::{ObjectId, Rect, SceneObject};

/// Minimum scale factor a transform can shrink an object to.
const MIN_SCALE: f32 = 0.1;

/// A scene: the drawable document edited in one journaling session.
///
/// Objects are kept in insertion order, which is also their z-order
/// (later objects render on top). Canvas width, height, and background
/// color are fixed at construction; resizing requires a new scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas width in pixels.
    width: f32,
    /// Canvas height in pixels.
    height: f32,
    /// Background color as hex.
    background: String,
    /// All objects in z-order.
    objects: Vec<SceneObject>,
    /// Currently selected object IDs, in z-order.
    selected: Vec<ObjectId>,
}

impl Scene {
    /// Create a new empty scene.
    #[must_use]
    pub fn new(width: f32, height: f32, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
            objects: Vec::new(),
            selected: Vec::new(),
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Background color as hex.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Add an object to the scene, on top of existing objects.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Remove objects by ID. Unknown IDs are skipped.
    ///
    /// Returns the number of objects actually removed.
    pub fn remove_objects(&mut self, ids: &[ObjectId]) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| !ids.contains(&o.id));
        self.selected.retain(|id| !ids.contains(id));
        before - self.objects.len()
    }

    /// Rotate and/or scale an object in place.
    ///
    /// `rotate_by` is added to the rotation in degrees; `scale_by` is added
    /// to both scale factors, clamped so the object never collapses. An
    /// unknown ID is a no-op returning `false`.
    pub fn transform_object(
        &mut self,
        id: ObjectId,
        rotate_by: Option<f32>,
        scale_by: Option<f32>,
    ) -> bool {
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        if let Some(delta) = rotate_by {
            object.rotation = (object.rotation + delta) % 360.0;
        }
        if let Some(delta) = scale_by {
            object.scale_x = (object.scale_x + delta).max(MIN_SCALE);
            object.scale_y = (object.scale_y + delta).max(MIN_SCALE);
        }
        true
    }

    /// Get an object by ID.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Get a mutable reference to an object by ID.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// All objects in z-order (bottom first).
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Number of objects in the scene.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove all objects and clear the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected.clear();
    }

    /// Find the object at the given canvas coordinates.
    ///
    /// Returns the topmost selectable object, since insertion order is
    /// z-order.
    #[must_use]
    pub fn object_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.flags.selectable && o.contains_point(x, y))
            .map(|o| o.id)
    }

    /// Select every selectable object intersecting the region; deselect
    /// all others.
    ///
    /// Returns the number of selected objects.
    pub fn select_region(&mut self, region: &Rect) -> usize {
        self.selected.clear();
        for object in &mut self.objects {
            let hit = object.flags.selectable && object.bounds().intersects(region);
            object.flags.has_controls = hit;
            if hit {
                self.selected.push(object.id);
            }
        }
        self.selected.len()
    }

    /// Deselect all objects.
    pub fn deselect_all(&mut self) {
        for object in &mut self.objects {
            object.flags.has_controls = false;
        }
        self.selected.clear();
    }

    /// IDs of currently selected objects, in z-order.
    #[must_use]
    pub fn selected_ids(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Check if any object is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }
}
