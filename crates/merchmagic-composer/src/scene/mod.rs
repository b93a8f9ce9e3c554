//! Ordered collection of scene objects.
//!
//! Index 0 is the bottom of the stack; objects later in the list paint over
//! earlier ones.

mod types;

pub use types::{ObjectId, ObjectKind, ObjectRole, OverlayContent, SceneObject, Shadow};

/// Z-ordered scene graph.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    next_id: ObjectId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    fn generate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds an object on top of the stack and returns its assigned id.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let index = self.objects.len();
        self.insert_at(object, index)
    }

    /// Inserts an object at a z-index (clamped to the stack size).
    pub fn insert_at(&mut self, mut object: SceneObject, index: usize) -> ObjectId {
        let id = self.generate_id();
        object.id = id;
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.z_index(id)?;
        Some(self.objects.remove(index))
    }

    /// Removes every object with `role`, returning how many were removed.
    pub fn remove_role(&mut self, role: ObjectRole) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| o.role() != role);
        before - self.objects.len()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// The lowest object with `role`.
    pub fn find_by_role(&self, role: ObjectRole) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.role() == role)
    }

    pub fn find_by_role_mut(&mut self, role: ObjectRole) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.role() == role)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn count_role(&self, role: ObjectRole) -> usize {
        self.objects.iter().filter(|o| o.role() == role).count()
    }

    pub fn z_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Moves an object to `index` (clamped to the top). Returns false when the
    /// id is unknown.
    pub fn set_z_order(&mut self, id: ObjectId, index: usize) -> bool {
        let Some(current) = self.z_index(id) else {
            return false;
        };
        let object = self.objects.remove(current);
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        true
    }

    /// All objects, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Exportable objects, bottom to top.
    pub fn objects_in_export_order(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.exportable)
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merchmagic_core::{Point, Rect, Rgba, Size};

    fn guide() -> SceneObject {
        SceneObject::covering(
            ObjectKind::PrintAreaGuide,
            &Rect::new(140.0, 180.0, 320.0, 420.0),
        )
    }

    fn overlay() -> SceneObject {
        SceneObject::new(
            ObjectKind::Overlay(OverlayContent::LinearGradient {
                from: Rgba::WHITE,
                to: Rgba::BLACK,
            }),
            Size::new(600.0, 780.0),
            Point::new(300.0, 390.0),
        )
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut scene = SceneGraph::new();
        let a = scene.add(guide());
        let b = scene.add(overlay());
        assert!(b > a);
        scene.remove(a);
        let c = scene.add(guide());
        assert!(c > b);
    }

    #[test]
    fn test_insert_at_and_z_order() {
        let mut scene = SceneGraph::new();
        let g = scene.add(guide());
        let o = scene.insert_at(overlay(), 0);
        assert_eq!(scene.ids(), vec![o, g]);

        assert!(scene.set_z_order(o, 10));
        assert_eq!(scene.ids(), vec![g, o]);
        assert!(!scene.set_z_order(999, 0));
    }

    #[test]
    fn test_export_order_skips_guides() {
        let mut scene = SceneGraph::new();
        scene.add(overlay());
        scene.add(guide());
        scene.add(overlay());
        let exported: Vec<_> = scene.objects_in_export_order().map(|o| o.role()).collect();
        assert_eq!(exported, vec![ObjectRole::Overlay, ObjectRole::Overlay]);
    }

    #[test]
    fn test_role_lookup_and_removal() {
        let mut scene = SceneGraph::new();
        scene.add(guide());
        scene.add(overlay());
        scene.add(overlay());
        assert_eq!(scene.count_role(ObjectRole::Overlay), 2);
        assert!(scene.find_by_name("print-area").is_some());
        assert_eq!(scene.remove_role(ObjectRole::Overlay), 2);
        assert_eq!(scene.len(), 1);
        assert!(scene.find_by_role(ObjectRole::Overlay).is_none());
    }
}
