//! # SketchKit
//!
//! An interactive 2D drawing-surface engine: shapes, selection handles,
//! incremental layered redraw, and animated image playback.
//!
//! ## Architecture
//!
//! SketchKit is organized as a workspace with multiple crates:
//!
//! 1. **sketchkit-core** - Geometry, colors, errors, performance monitor
//! 2. **sketchkit-canvas** - The engine: shape model, hit testing,
//!    selection/manipulation state machine, render scheduler, image cache
//! 3. **sketchkit** - Demo binary that drives the engine headlessly
//!
//! ## Features
//!
//! - **Shape model**: rectangles, ellipses, and raster/animated images with
//!   stable ids and layer-ranked paint order
//! - **Interaction**: hover, single/multi select, drag-move, drag-resize
//!   with per-axis handle flipping
//! - **Incremental redraw**: per-shape layer bitmaps, repainted only when
//!   dirty
//! - **Animation**: per-shape GIF frame playback with explicit, cancellable
//!   scheduling
//! - **Performance monitoring**: rolling frame samples with CSV export

pub mod generator;

pub use sketchkit_canvas::{
    Canvas, Circle, Controller, ControllerState, Handle, ImageShape, PixmapSurface, Rectangle,
    Shape, ShapeStore,
};
pub use sketchkit_core::{Bounds, Color, PerfMonitor, Point};

/// Initializes the tracing subscriber for the process: env-filtered, pretty
/// stdout output, `info` by default.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
