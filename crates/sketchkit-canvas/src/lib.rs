//! # SketchKit Canvas
//!
//! The interactive drawing-surface engine: shape model and store, pointer
//! hit testing, the selection/manipulation state machine, incremental
//! layered redraw, and per-shape image/animation caching.
//!
//! The engine is headless: it draws through the [`DrawSurface`] abstraction
//! and consumes pointer events through plain method calls, so any windowing
//! binding (or none — see the demo binary) can sit on top.

pub mod canvas;
pub mod controller;
pub mod images;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod selection;
pub mod snapshot;
pub mod store;
pub mod surface;

pub use canvas::Canvas;
pub use controller::{apply_resize, Controller, ControllerState, ResizedFrame, ShapeChangeSink};
pub use hit_test::{hit_test, hit_test_handle, Handle};
pub use images::{FsImageLoader, ImageCache, ImageLoader};
pub use model::{Circle, ImageShape, Rectangle, Shape, ShapeType};
pub use render::{draw_outline, draw_shape};
pub use scheduler::{RenderScheduler, RenderStats};
pub use selection::Selection;
pub use store::ShapeStore;
pub use surface::{Bitmap, DrawCommand, DrawSurface, PixmapSurface, RecordingSurface, StrokeStyle};
