//! Arena-style shape store indexed by id.
//!
//! All mutation of shape values flows through [`ShapeStore::update`]: callers
//! compute a new shape value and commit it, replacing the stored entry. No
//! shared references are mutated in place, which keeps the
//! at-most-one-writer-per-frame property without relying on aliasing.

use sketchkit_core::error::CanvasError;

use crate::model::Shape;

/// Ordered collection of shapes. Insertion order is retained only as the
/// paint-order tiebreak; the primary paint order is the `layer` rank.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    next_id: u64,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            next_id: 1,
        }
    }

    /// Generates a new unique id.
    pub fn generate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Sets the next id to be generated (used when restoring snapshots).
    pub fn set_next_id(&mut self, id: u64) {
        self.next_id = id;
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.shapes.iter().any(|s| s.id() == id)
    }

    /// Inserts a shape. The shape's id must be unused.
    pub fn insert(&mut self, shape: Shape) -> Result<u64, CanvasError> {
        let id = shape.id();
        if self.contains(id) {
            return Err(CanvasError::DuplicateShape { id });
        }
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        self.shapes.push(shape);
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Commits a new value for an existing shape, replacing the stored entry
    /// whose id matches.
    pub fn update(&mut self, shape: Shape) -> Result<(), CanvasError> {
        let id = shape.id();
        match self.shapes.iter_mut().find(|s| s.id() == id) {
            Some(slot) => {
                *slot = shape;
                Ok(())
            }
            None => Err(CanvasError::ShapeNotFound { id }),
        }
    }

    /// Removes a shape and returns it.
    pub fn remove(&mut self, id: u64) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.shapes.iter().map(|s| s.id())
    }

    /// Ids in paint order: ascending `layer`, insertion order within a layer.
    pub fn paint_order(&self) -> Vec<u64> {
        let mut order: Vec<(i32, usize, u64)> = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.layer(), i, s.id()))
            .collect();
        order.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        order.into_iter().map(|(_, _, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Circle, Rectangle};

    fn rect(id: u64, layer: i32) -> Shape {
        let mut r = Rectangle::new(id, 0.0, 0.0, 10.0, 10.0);
        r.layer = layer;
        r.into()
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut store = ShapeStore::new();
        store.insert(rect(1, 0)).expect("fresh id inserts");
        let err = store.insert(rect(1, 0)).expect_err("duplicate id rejected");
        assert!(matches!(err, CanvasError::DuplicateShape { id: 1 }));
    }

    #[test]
    fn generate_id_never_reissues_an_inserted_id() {
        let mut store = ShapeStore::new();
        store.insert(rect(10, 0)).expect("explicit id inserts");
        let id = store.generate_id();
        assert!(id > 10);
    }

    #[test]
    fn update_replaces_value_by_id() {
        let mut store = ShapeStore::new();
        store.insert(rect(1, 0)).unwrap();

        let mut replacement = Rectangle::new(1, 5.0, 5.0, 20.0, 20.0);
        replacement.layer = 3;
        store
            .update(replacement.into())
            .expect("existing id updates");

        let stored = store.get(1).expect("shape still present");
        assert_eq!(stored.frame(), (5.0, 5.0, 20.0, 20.0));
        assert_eq!(stored.layer(), 3);

        let err = store
            .update(rect(99, 0))
            .expect_err("unknown id is an error");
        assert!(matches!(err, CanvasError::ShapeNotFound { id: 99 }));
    }

    #[test]
    fn paint_order_sorts_by_layer_then_insertion() {
        let mut store = ShapeStore::new();
        store.insert(rect(1, 5)).unwrap();
        store.insert(Circle::new(2, 0.0, 0.0, 4.0, 4.0).into()).unwrap(); // layer 0
        store.insert(rect(3, 5)).unwrap();
        store.insert(rect(4, -1)).unwrap();

        assert_eq!(store.paint_order(), vec![4, 2, 1, 3]);
    }

    #[test]
    fn remove_returns_the_shape() {
        let mut store = ShapeStore::new();
        store.insert(rect(1, 0)).unwrap();
        let removed = store.remove(1).expect("shape removed");
        assert_eq!(removed.id(), 1);
        assert!(store.is_empty());
        assert!(store.remove(1).is_none());
    }
}
