//! Circle shape. The visual is the ellipse inscribed in the bounding box;
//! width and height vary independently.

use serde::{Deserialize, Serialize};
use sketchkit_core::{Bounds, Color, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Visual rotation in degrees around the shape center. Does not affect
    /// hit testing.
    pub rotation: f64,
    pub filled: bool,
    pub border_width: f64,
    pub border_color: Color,
    pub fill_color: Color,
    /// Paint-order rank; higher layers draw on top.
    pub layer: i32,
}

impl Circle {
    pub fn new(id: u64, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            filled: true,
            border_width: 1.0,
            border_color: Color::BLACK,
            fill_color: Color::rgb(46, 204, 113),
            layer: 0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Handles and selection operate on the bounding rectangle, exactly like
    /// Rectangle.
    pub fn bounding_box(&self) -> Bounds {
        Bounds::from_xywh(self.x, self.y, self.width, self.height)
    }

    /// True distance test against the smaller semi-axis.
    pub fn contains_point(&self, point: &Point) -> bool {
        let radius = self.width.min(self.height) / 2.0;
        self.center().distance_to(point) <= radius
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}
