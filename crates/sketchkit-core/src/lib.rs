//! # SketchKit Core
//!
//! Core types, traits, and utilities for SketchKit.
//! Provides the fundamental abstractions shared by the canvas engine and the
//! demo binary: geometry primitives, colors, error types, the performance
//! monitor, and shared-state type aliases.

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod perf;
pub mod types;

pub use color::Color;
pub use error::{CanvasError, Error, ExportError, ImageError, Result};
pub use geometry::{rotate_point, Bounds, Point};
pub use perf::{PerfMonitor, PerfSample};

// Re-export type aliases for convenience
pub use types::{shared, thread_safe, Shared, ThreadSafe, ThreadSafeVec};
