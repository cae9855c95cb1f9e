//! Render scheduler: per-shape dirty tracking over snapshot diffs.
//!
//! One layer record per shape. Reconciliation diffs the store against the
//! stored snapshots by id; only dirty layers get repainted, which keeps paint
//! cost proportional to shapes actually changing rather than total shape
//! count.

use std::collections::HashMap;

use crate::model::Shape;
use crate::store::ShapeStore;

/// Per-shape render bookkeeping: the last painted value and whether it needs
/// a repaint.
#[derive(Debug, Clone)]
struct LayerRecord {
    snapshot: Shape,
    dirty: bool,
}

/// Frame statistics, kept across the scheduler's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frame_count: u64,
    pub shapes_drawn: usize,
    pub shapes_skipped: usize,
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    layers: HashMap<u64, LayerRecord>,
    stats: RenderStats,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles layer records against the store by shape id.
    ///
    /// New ids get a fresh layer marked dirty; existing ids are marked dirty
    /// iff their content differs field-by-field from the stored snapshot.
    /// Returns the ids whose layers were dropped (shape removed from the
    /// store) so the caller can release per-shape resources.
    pub fn reconcile(&mut self, store: &ShapeStore) -> Vec<u64> {
        for shape in store.iter() {
            match self.layers.get_mut(&shape.id()) {
                Some(layer) => {
                    if layer.snapshot != *shape {
                        layer.snapshot = shape.clone();
                        layer.dirty = true;
                    }
                }
                None => {
                    self.layers.insert(
                        shape.id(),
                        LayerRecord {
                            snapshot: shape.clone(),
                            dirty: true,
                        },
                    );
                }
            }
        }

        let removed: Vec<u64> = self
            .layers
            .keys()
            .copied()
            .filter(|id| !store.contains(*id))
            .collect();
        for id in &removed {
            self.layers.remove(id);
        }
        removed
    }

    /// Force-marks layers dirty regardless of snapshot equality. Used for
    /// shapes under an active manipulation, which must repaint every frame.
    pub fn force_dirty(&mut self, ids: impl IntoIterator<Item = u64>) {
        for id in ids {
            if let Some(layer) = self.layers.get_mut(&id) {
                layer.dirty = true;
            }
        }
    }

    /// Marks a single layer dirty (e.g. a decode completed or an animation
    /// frame advanced for that shape).
    pub fn mark_dirty(&mut self, id: u64) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.dirty = true;
        }
    }

    pub fn is_dirty(&self, id: u64) -> bool {
        self.layers.get(&id).map(|l| l.dirty).unwrap_or(false)
    }

    pub fn dirty_count(&self) -> usize {
        self.layers.values().filter(|l| l.dirty).count()
    }

    /// Marks a layer as painted.
    pub fn mark_clean(&mut self, id: u64) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.dirty = false;
        }
    }

    /// Closes out a frame, recording how many layers were repainted versus
    /// composed from cache.
    pub fn end_frame(&mut self, drawn: usize, skipped: usize) {
        self.stats.frame_count += 1;
        self.stats.shapes_drawn = drawn;
        self.stats.shapes_skipped = skipped;
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Drops all layer records (engine teardown or full reset).
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}
