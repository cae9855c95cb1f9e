//! Canvas facade: wires the store, controller, scheduler, image cache, and
//! renderer into the engine's public surface.
//!
//! Repainting is layered: each shape renders into its own cached bitmap only
//! when its layer is dirty; composition blits the cached bitmaps in paint
//! order every frame, and the selection overlay is drawn on top last (its
//! geometry depends on pointer state, not shape content).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use sketchkit_core::constants::SELECTION_PADDING;
use sketchkit_core::error::CanvasError;
use sketchkit_core::{rotate_point, Bounds, Color, PerfMonitor, Point};

use crate::controller::{Controller, ControllerState, ShapeChangeSink};
use crate::images::{ImageCache, ImageLoader};
use crate::model::{Circle, ImageShape, Rectangle, Shape};
use crate::render;
use crate::scheduler::{RenderScheduler, RenderStats};
use crate::selection::Selection;
use crate::store::ShapeStore;
use crate::surface::{Bitmap, DrawSurface, PixmapSurface};

/// A shape's cached rendering, positioned on the canvas by its origin.
struct PaintedLayer {
    origin: Point,
    bitmap: Bitmap,
}

pub struct Canvas {
    store: ShapeStore,
    controller: Controller,
    scheduler: RenderScheduler,
    images: ImageCache,
    painted: HashMap<u64, PaintedLayer>,
    background: Color,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("shapes", &self.store.len())
            .field("state", &self.controller.state())
            .finish()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_loader(Arc::new(crate::images::FsImageLoader))
    }

    /// Creates a canvas resolving image urls through the given loader.
    pub fn with_loader(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            store: ShapeStore::new(),
            controller: Controller::new(),
            scheduler: RenderScheduler::new(),
            images: ImageCache::new(loader),
            painted: HashMap::new(),
            background: Color::rgb(250, 250, 250),
        }
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    // --- shape collection ---

    pub fn shape_count(&self) -> usize {
        self.store.len()
    }

    pub fn shape(&self, id: u64) -> Option<&Shape> {
        self.store.get(id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.store.iter()
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn generate_id(&mut self) -> u64 {
        self.store.generate_id()
    }

    /// Adds a rectangle with default styling.
    pub fn add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> u64 {
        let id = self.store.generate_id();
        // A freshly generated id cannot collide.
        let _ = self.store.insert(Rectangle::new(id, x, y, width, height).into());
        id
    }

    /// Adds a circle (bounding ellipse) with default styling.
    pub fn add_circle(&mut self, x: f64, y: f64, width: f64, height: f64) -> u64 {
        let id = self.store.generate_id();
        let _ = self.store.insert(Circle::new(id, x, y, width, height).into());
        id
    }

    /// Adds an image shape; decode begins on its first draw.
    pub fn add_image(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        url: impl Into<String>,
    ) -> u64 {
        let id = self.store.generate_id();
        let _ = self
            .store
            .insert(ImageShape::new(id, x, y, width, height, url).into());
        id
    }

    /// Adds a fully-formed shape carrying its own id.
    pub fn add_shape(&mut self, shape: Shape) -> Result<u64, CanvasError> {
        self.store.insert(shape)
    }

    /// Removes a shape and releases its layer, cache entry, and any pending
    /// animation advance. Dangling selection ids are pruned.
    pub fn remove_shape(&mut self, id: u64) -> Option<Shape> {
        let removed = self.store.remove(id)?;
        self.images.remove(id);
        self.painted.remove(&id);
        self.controller.prune(&self.store);
        Some(removed)
    }

    /// Commits a programmatic edit: the stored entry is replaced by id and
    /// the shape-change sink is notified once.
    pub fn update_shape(&mut self, shape: Shape) -> Result<(), CanvasError> {
        self.store.update(shape.clone())?;
        self.controller.notify(&shape);
        Ok(())
    }

    // --- selection & interaction ---

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn selection(&self) -> &Selection {
        self.controller.selection()
    }

    /// Union bounds of the current selection, padded for outline/handles.
    pub fn selection_bounds(&self) -> Option<Bounds> {
        self.controller.selection().bounds(&self.store)
    }

    pub fn set_change_sink(&mut self, sink: ShapeChangeSink) {
        self.controller.set_change_sink(sink);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, modifier: bool) {
        self.controller
            .pointer_down(&mut self.store, Point::new(x, y), modifier);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.controller.pointer_move(&mut self.store, Point::new(x, y));
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        self.controller.pointer_up(&mut self.store, Point::new(x, y));
    }

    pub fn select_all(&mut self) {
        self.controller.select_all(&self.store);
    }

    pub fn clear_selection(&mut self) {
        self.controller.clear_selection();
    }

    /// Removes every selected shape, returning them in id order.
    pub fn remove_selected(&mut self) -> Vec<Shape> {
        let ids: Vec<u64> = self.controller.selection().iter().collect();
        ids.into_iter()
            .filter_map(|id| self.remove_shape(id))
            .collect()
    }

    // --- frame loop ---

    /// Pumps time-driven work: drains finished image decodes and advances
    /// due animation frames, dirtying only the affected layers.
    pub fn tick(&mut self, now: Instant) {
        for id in self.images.poll() {
            self.scheduler.mark_dirty(id);
        }
        for id in self.images.advance_due(now) {
            self.scheduler.mark_dirty(id);
        }
    }

    /// Renders one frame: reconcile dirty layers, repaint only those, blit
    /// all cached layers in paint order, then the hover/selection overlay.
    ///
    /// When `perf` is given, the frame's render time and shape count are
    /// recorded on it.
    pub fn render(
        &mut self,
        surface: &mut dyn DrawSurface,
        now: Instant,
        mut perf: Option<&mut PerfMonitor>,
    ) {
        let started = Instant::now();

        let removed = self.scheduler.reconcile(&self.store);
        for id in removed {
            self.images.remove(id);
            self.painted.remove(&id);
        }
        self.controller.prune(&self.store);

        // Shapes under an active drag mutate every frame and must repaint
        // even before the diff above has caught up.
        if self.controller.is_manipulating() {
            let ids: Vec<u64> = self.controller.manipulated_ids().collect();
            self.scheduler.force_dirty(ids);
        }

        let order = self.store.paint_order();
        let mut drawn = 0;
        let mut skipped = 0;
        for &id in &order {
            if self.scheduler.is_dirty(id) {
                self.repaint_layer(id, now);
                self.scheduler.mark_clean(id);
                drawn += 1;
            } else {
                skipped += 1;
            }
        }

        surface.clear(self.background);
        for &id in &order {
            if let Some(layer) = self.painted.get(&id) {
                let rect = Bounds::from_xywh(
                    layer.origin.x,
                    layer.origin.y,
                    layer.bitmap.width() as f64,
                    layer.bitmap.height() as f64,
                );
                surface.blit(&layer.bitmap, rect, 0.0);
            }
        }

        if let Some(hover) = self.controller.selection().hovering() {
            if !self.controller.selection().contains(hover) {
                if let Some(shape) = self.store.get(hover) {
                    let bounds = shape.bounding_box().expand(SELECTION_PADDING);
                    render::draw_outline(surface, &bounds, render::HOVER_COLOR, false);
                }
            }
        }
        if let Some(bounds) = self.controller.selection().bounds(&self.store) {
            render::draw_outline(surface, &bounds, render::SELECTION_COLOR, true);
        }

        self.scheduler.end_frame(drawn, skipped);

        if let Some(perf) = perf.as_deref_mut() {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            perf.record_frame(elapsed_ms, self.store.len());
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.scheduler.stats()
    }

    /// Drops every shape, layer, and cache entry. Pending animation advances
    /// are cancelled with their entries.
    pub fn clear(&mut self) {
        self.store.clear();
        self.scheduler.clear();
        self.images.clear();
        self.painted.clear();
        self.controller.clear_selection();
    }

    fn repaint_layer(&mut self, id: u64, now: Instant) {
        let Some(shape) = self.store.get(id).cloned() else {
            self.painted.remove(&id);
            return;
        };

        let bounds = layer_paint_bounds(&shape);
        let width = bounds.width().ceil() as u32;
        let height = bounds.height().ceil() as u32;
        let Some(mut layer_surface) = PixmapSurface::new(width, height) else {
            // Degenerate geometry paints nothing; the old bitmap (if any) is
            // stale and must not be composed.
            self.painted.remove(&id);
            return;
        };

        let mut local = shape.clone();
        let (x, y, w, h) = local.frame();
        local.set_frame(x - bounds.min_x, y - bounds.min_y, w, h);
        render::draw_shape(&mut layer_surface, &local, &mut self.images);

        if let Shape::Image(img) = &shape {
            self.images.ensure_scheduled(img.id, now);
        }

        self.painted.insert(
            id,
            PaintedLayer {
                origin: Point::new(bounds.min_x, bounds.min_y),
                bitmap: layer_surface.into_bitmap(),
            },
        );
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

/// The canvas-space region a shape's layer bitmap must cover: the bounding
/// box, widened to the rotated box's extents when the shape is rotated, plus
/// room for the stroke to overhang the path.
fn layer_paint_bounds(shape: &Shape) -> Bounds {
    let bounds = shape.bounding_box();
    let rotation = shape.rotation();

    let bounds = if rotation.abs() > 1e-6 {
        let center = bounds.center();
        let mut rotated = Bounds::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for corner in bounds.corners() {
            let p = rotate_point(corner, center, rotation);
            rotated.min_x = rotated.min_x.min(p.x);
            rotated.min_y = rotated.min_y.min(p.y);
            rotated.max_x = rotated.max_x.max(p.x);
            rotated.max_y = rotated.max_y.max(p.y);
        }
        rotated
    } else {
        bounds
    };

    let stroke = match shape {
        Shape::Rectangle(r) => r.border_width,
        Shape::Circle(c) => c.border_width,
        Shape::Image(_) => 0.0,
    };
    bounds.expand(stroke / 2.0 + 1.0)
}
