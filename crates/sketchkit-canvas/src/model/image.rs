//! Image shape: a raster (or animated) source blitted into a rectangle.

use serde::{Deserialize, Serialize};
use sketchkit_core::{Bounds, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageShape {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Visual rotation in degrees around the shape center. Does not affect
    /// hit testing.
    pub rotation: f64,
    /// Source the frame cache resolves through its loader. Content is cached
    /// per shape id, never shared across ids with the same url.
    pub url: String,
    /// Paint-order rank; higher layers draw on top.
    pub layer: i32,
}

impl ImageShape {
    pub fn new(id: u64, x: f64, y: f64, width: f64, height: f64, url: impl Into<String>) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            url: url.into(),
            layer: 0,
        }
    }

    pub fn bounding_box(&self) -> Bounds {
        Bounds::from_xywh(self.x, self.y, self.width, self.height)
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        self.bounding_box().contains(point)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}
