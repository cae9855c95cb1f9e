//! Shape model: the tagged union of drawable entities.

mod circle;
mod image;
mod rectangle;

pub use circle::Circle;
pub use image::ImageShape;
pub use rectangle::Rectangle;

use serde::{Deserialize, Serialize};
use sketchkit_core::{Bounds, Point};

/// Kinds of shapes on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Rectangle,
    Circle,
    Image,
}

/// Enum wrapper for all drawable shapes.
///
/// Identity is the embedded `id`, assigned by the store at creation and never
/// changed; equality of whole values (`PartialEq`) is what the render
/// scheduler diffs against its snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Image(ImageShape),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Rectangle(_) => ShapeType::Rectangle,
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Image(_) => ShapeType::Image,
        }
    }

    /// Stable identifier used for identity comparison everywhere.
    pub fn id(&self) -> u64 {
        match self {
            Shape::Rectangle(s) => s.id,
            Shape::Circle(s) => s.id,
            Shape::Image(s) => s.id,
        }
    }

    /// Paint-order rank (ascending).
    pub fn layer(&self) -> i32 {
        match self {
            Shape::Rectangle(s) => s.layer,
            Shape::Circle(s) => s.layer,
            Shape::Image(s) => s.layer,
        }
    }

    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Circle(s) => s.rotation,
            Shape::Image(s) => s.rotation,
        }
    }

    /// Axis-aligned bounding box; rotation is deliberately ignored (matches
    /// the hit-test region).
    pub fn bounding_box(&self) -> Bounds {
        match self {
            Shape::Rectangle(s) => s.bounding_box(),
            Shape::Circle(s) => s.bounding_box(),
            Shape::Image(s) => s.bounding_box(),
        }
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        match self {
            Shape::Rectangle(s) => s.contains_point(point),
            Shape::Circle(s) => s.contains_point(point),
            Shape::Image(s) => s.contains_point(point),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Rectangle(s) => s.translate(dx, dy),
            Shape::Circle(s) => s.translate(dx, dy),
            Shape::Image(s) => s.translate(dx, dy),
        }
    }

    /// Position and size as `(x, y, width, height)`.
    pub fn frame(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Rectangle(s) => (s.x, s.y, s.width, s.height),
            Shape::Circle(s) => (s.x, s.y, s.width, s.height),
            Shape::Image(s) => (s.x, s.y, s.width, s.height),
        }
    }

    /// Replaces position and size wholesale. Callers are responsible for
    /// keeping width/height non-negative (the controller normalizes before
    /// committing).
    pub fn set_frame(&mut self, x: f64, y: f64, width: f64, height: f64) {
        match self {
            Shape::Rectangle(s) => {
                s.x = x;
                s.y = y;
                s.width = width;
                s.height = height;
            }
            Shape::Circle(s) => {
                s.x = x;
                s.y = y;
                s.width = width;
                s.height = height;
            }
            Shape::Image(s) => {
                s.x = x;
                s.y = y;
                s.width = width;
                s.height = height;
            }
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<ImageShape> for Shape {
    fn from(s: ImageShape) -> Self {
        Shape::Image(s)
    }
}
