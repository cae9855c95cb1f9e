//! Selection & manipulation controller: the pointer-driven state machine.
//!
//! States: `Idle`, `Hovering`, `Selected`, `Moving`, `Resizing`. All shape
//! mutation during a gesture is committed through [`ShapeStore::update`] and
//! reported through the shape-change sink, once per mutated shape per frame.

use std::collections::BTreeSet;

use sketchkit_core::constants::MIN_SHAPE_SIZE;
use sketchkit_core::Point;

use crate::hit_test::{hit_test, hit_test_handle, Handle};
use crate::model::Shape;
use crate::selection::Selection;
use crate::store::ShapeStore;

/// External collaborator notified of each committed shape mutation.
pub type ShapeChangeSink = Box<dyn FnMut(&Shape)>;

/// Interaction state. At most one manipulation is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Hovering { shape: u64 },
    Selected,
    Moving,
    Resizing { handle: Handle },
}

pub struct Controller {
    state: ControllerState,
    selection: Selection,
    /// Ids snapshot taken when a manipulation starts.
    manipulated: BTreeSet<u64>,
    /// Delta basis: the pointer position of the previous manipulation frame.
    last_point: Option<Point>,
    sink: Option<ShapeChangeSink>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("selection", &self.selection)
            .field("manipulated", &self.manipulated)
            .field("last_point", &self.last_point)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: ControllerState::Idle,
            selection: Selection::new(),
            manipulated: BTreeSet::new(),
            last_point: None,
            sink: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Installs the shape-change sink. Without one the controller still
    /// commits to the store; only the notification is skipped.
    pub fn set_change_sink(&mut self, sink: ShapeChangeSink) {
        self.sink = Some(sink);
    }

    pub fn is_manipulating(&self) -> bool {
        matches!(
            self.state,
            ControllerState::Moving | ControllerState::Resizing { .. }
        )
    }

    /// Ids being dragged this gesture; empty outside a manipulation.
    pub fn manipulated_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.manipulated.iter().copied()
    }

    /// Reports a committed mutation to the external sink, if any.
    pub(crate) fn notify(&mut self, shape: &Shape) {
        if let Some(sink) = self.sink.as_mut() {
            sink(shape);
        }
    }

    fn transition(&mut self, next: ControllerState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "controller transition");
            self.state = next;
        }
    }

    /// Pointer pressed. Resolves, in priority order: resize-handle grab,
    /// move grab on an already-selected shape, then click selection.
    pub fn pointer_down(&mut self, store: &mut ShapeStore, point: Point, modifier: bool) {
        self.selection.prune(store);

        // Handle grab takes precedence over everything under the pointer.
        if let Some(bounds) = self.selection.bounds(store) {
            if let Some(handle) = hit_test_handle(&bounds, &point) {
                self.begin_manipulation(point);
                self.transition(ControllerState::Resizing { handle });
                return;
            }
        }

        let top_hit = hit_test(store, &point).first().copied();

        match top_hit {
            Some(id) if self.selection.contains(id) && !modifier => {
                // Pressing an already-selected shape starts a move of the
                // whole selection.
                self.begin_manipulation(point);
                self.transition(ControllerState::Moving);
            }
            Some(id) if modifier => {
                self.selection.toggle(id);
                if self.selection.is_empty() {
                    self.transition(ControllerState::Idle);
                } else {
                    self.transition(ControllerState::Selected);
                }
            }
            Some(id) => {
                self.selection.select_only(id);
                self.transition(ControllerState::Selected);
            }
            None => {
                if !modifier {
                    self.selection.clear();
                    self.transition(ControllerState::Idle);
                }
            }
        }
    }

    /// Pointer moved. Drives the active manipulation, or hover tracking when
    /// no button gesture is in flight.
    pub fn pointer_move(&mut self, store: &mut ShapeStore, point: Point) {
        match self.state {
            ControllerState::Moving => self.drag_move(store, point),
            ControllerState::Resizing { handle } => self.drag_resize(store, point, handle),
            _ => self.update_hover(store, point),
        }
    }

    /// Pointer released: a manipulation resolves, the manipulated set stays
    /// selected.
    pub fn pointer_up(&mut self, _store: &mut ShapeStore, _point: Point) {
        if self.is_manipulating() {
            self.manipulated.clear();
            self.last_point = None;
            self.transition(ControllerState::Selected);
        }
    }

    /// Selects every shape in the store.
    pub fn select_all(&mut self, store: &ShapeStore) {
        for id in store.ids() {
            self.selection.insert(id);
        }
        if !self.selection.is_empty() {
            self.transition(ControllerState::Selected);
        }
    }

    /// Drops the selection and aborts any manipulation in flight.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.manipulated.clear();
        self.last_point = None;
        self.transition(ControllerState::Idle);
    }

    /// Re-validates controller state after the store changed: dangling
    /// selection/hover ids are pruned and the machine leaves states whose
    /// subject disappeared.
    pub fn prune(&mut self, store: &ShapeStore) {
        self.selection.prune(store);
        match self.state {
            ControllerState::Hovering { shape } if !store.contains(shape) => {
                self.transition(ControllerState::Idle);
            }
            ControllerState::Selected if self.selection.is_empty() => {
                self.transition(ControllerState::Idle);
            }
            _ => {}
        }
    }

    fn begin_manipulation(&mut self, point: Point) {
        self.manipulated = self.selection.iter().collect();
        self.last_point = Some(point);
    }

    fn update_hover(&mut self, store: &mut ShapeStore, point: Point) {
        let top_hit = hit_test(store, &point).first().copied();
        self.selection.set_hover(top_hit);

        // The explicit Hovering state only applies while nothing is selected;
        // with a selection the machine stays in Selected and hover is carried
        // by the selection state.
        if self.selection.is_empty() {
            match top_hit {
                Some(shape) => self.transition(ControllerState::Hovering { shape }),
                None => self.transition(ControllerState::Idle),
            }
        }
    }

    fn drag_move(&mut self, store: &mut ShapeStore, point: Point) {
        let Some(last) = self.last_point else { return };
        let (dx, dy) = (point.x - last.x, point.y - last.y);
        self.last_point = Some(point);
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        let ids: Vec<u64> = self.manipulated.iter().copied().collect();
        for id in ids {
            let Some(mut shape) = store.get(id).cloned() else { continue };
            shape.translate(dx, dy);
            if store.update(shape.clone()).is_ok() {
                self.notify(&shape);
            }
        }
    }

    fn drag_resize(&mut self, store: &mut ShapeStore, point: Point, handle: Handle) {
        let Some(last) = self.last_point else { return };
        let (dx, dy) = (point.x - last.x, point.y - last.y);
        self.last_point = Some(point);
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        let mut flipped_x = false;
        let mut flipped_y = false;

        let ids: Vec<u64> = self.manipulated.iter().copied().collect();
        for id in ids {
            let Some(mut shape) = store.get(id).cloned() else { continue };
            let (x, y, w, h) = shape.frame();
            let resized = apply_resize(x, y, w, h, handle, dx, dy);
            shape.set_frame(resized.x, resized.y, resized.width, resized.height);
            flipped_x |= resized.flipped_x;
            flipped_y |= resized.flipped_y;
            if store.update(shape.clone()).is_ok() {
                self.notify(&shape);
            }
        }

        // Handle reassignment is evaluated independently per axis; a single
        // frame can flip horizontally, vertically, or both.
        let mut next = handle;
        if flipped_x {
            next = next.mirror_x();
        }
        if flipped_y {
            next = next.mirror_y();
        }
        if next != handle {
            self.transition(ControllerState::Resizing { handle: next });
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one frame of resize math on a single shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizedFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub flipped_x: bool,
    pub flipped_y: bool,
}

/// Applies a handle drag delta to a frame.
///
/// The dragged handle's opposite corner is the anchor. A dimension driven
/// negative is normalized by shifting the coordinate by the signed amount and
/// taking the absolute value; that axis reports a flip so the caller can
/// mirror the active handle. The minimum-size floor applies only to
/// non-inverted shrinks — a flip keeps its exact (absolute) size so the
/// corner tracks the pointer across the anchor.
pub fn apply_resize(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    handle: Handle,
    dx: f64,
    dy: f64,
) -> ResizedFrame {
    let (mut x, mut y) = (x, y);
    let (mut w, mut h) = (width, height);

    if handle.is_left() {
        w -= dx;
        x += dx;
    } else {
        w += dx;
    }
    if handle.is_top() {
        h -= dy;
        y += dy;
    } else {
        h += dy;
    }

    let mut flipped_x = false;
    let mut flipped_y = false;

    if w < 0.0 {
        x += w;
        w = -w;
        flipped_x = true;
    } else if w < MIN_SHAPE_SIZE {
        w = MIN_SHAPE_SIZE;
    }
    if h < 0.0 {
        y += h;
        h = -h;
        flipped_y = true;
    } else if h < MIN_SHAPE_SIZE {
        h = MIN_SHAPE_SIZE;
    }

    ResizedFrame {
        x,
        y,
        width: w,
        height: h,
        flipped_x,
        flipped_y,
    }
}
