//! Selection state: a set of shape ids plus the current hover target.
//!
//! Membership is always keyed by shape id; shape values are never compared
//! by reference or structure for selection purposes.

use std::collections::BTreeSet;

use sketchkit_core::constants::SELECTION_PADDING;
use sketchkit_core::Bounds;

use crate::store::ShapeStore;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: BTreeSet<u64>,
    hovering: Option<u64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }

    /// Replaces the whole selection with a single shape.
    pub fn select_only(&mut self, id: u64) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Adds `id` to the selection, keeping existing members.
    pub fn insert(&mut self, id: u64) {
        self.ids.insert(id);
    }

    /// Toggles membership of `id`: adds if absent, removes if present.
    /// Returns true when the id is selected afterwards.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn hovering(&self) -> Option<u64> {
        self.hovering
    }

    pub fn set_hover(&mut self, id: Option<u64>) {
        self.hovering = id;
    }

    /// Drops selected/hovered ids that no longer exist in the store.
    pub fn prune(&mut self, store: &ShapeStore) {
        self.ids.retain(|id| store.contains(*id));
        if let Some(id) = self.hovering {
            if !store.contains(id) {
                self.hovering = None;
            }
        }
    }

    /// Union bounding box of the selected shapes, expanded by the selection
    /// padding. `None` when nothing is selected.
    pub fn bounds(&self, store: &ShapeStore) -> Option<Bounds> {
        let mut union: Option<Bounds> = None;
        for id in &self.ids {
            if let Some(shape) = store.get(*id) {
                let b = shape.bounding_box();
                union = Some(match union {
                    Some(u) => u.union(&b),
                    None => b,
                });
            }
        }
        union.map(|b| b.expand(SELECTION_PADDING))
    }
}
