//! Engine-wide constants.

/// Padding, in canvas units, added around a selection's union bounding box
/// before drawing the outline and placing handles.
pub const SELECTION_PADDING: f64 = 3.0;

/// Radius of a corner handle's hit circle, in canvas units.
pub const HANDLE_HIT_RADIUS: f64 = 5.0;

/// Visual radius of a corner handle.
pub const HANDLE_DRAW_RADIUS: f64 = 4.0;

/// Stroke width of a corner handle's black ring.
pub const HANDLE_STROKE_WIDTH: f64 = 1.5;

/// Minimum width/height a shape may reach through interactive resizing.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Dash pattern (on, off) for the selection outline.
pub const OUTLINE_DASH: (f64, f64) = (4.0, 4.0);

/// Corner radius of the selection outline rectangle.
pub const OUTLINE_CORNER_RADIUS: f64 = 2.0;

/// Default capacity of the performance monitor's rolling sample buffer.
pub const PERF_SAMPLE_CAPACITY: usize = 1000;
