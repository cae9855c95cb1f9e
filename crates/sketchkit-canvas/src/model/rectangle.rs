//! Rectangle shape.

use serde::{Deserialize, Serialize};
use sketchkit_core::{Bounds, Color, Point};

/// A rectangle defined by its top-left corner and dimensions, with optional
/// rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Visual rotation in degrees around the shape center. Does not affect
    /// hit testing.
    pub rotation: f64,
    pub corner_radius: f64,
    pub filled: bool,
    pub border_width: f64,
    pub border_color: Color,
    pub fill_color: Color,
    /// Paint-order rank; higher layers draw on top.
    pub layer: i32,
}

impl Rectangle {
    pub fn new(id: u64, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            corner_radius: 0.0,
            filled: true,
            border_width: 1.0,
            border_color: Color::BLACK,
            fill_color: Color::rgb(52, 152, 219),
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

    /// Corner radius actually drawable given the current dimensions.
    pub fn effective_corner_radius(&self) -> f64 {
        self.corner_radius
            .min(self.width / 2.0)
            .min(self.height / 2.0)
            .max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_point_is_axis_aligned() {
        let mut rect = Rectangle::new(1, 10.0, 10.0, 50.0, 20.0);
        rect.rotation = 45.0;
        // Rotation is visual only; hit region stays the unrotated box.
        assert!(rect.contains_point(&Point::new(59.0, 29.0)));
        assert!(!rect.contains_point(&Point::new(61.0, 31.0)));
    }

    #[test]
    fn effective_radius_is_clamped_to_half_extent() {
        let mut rect = Rectangle::new(1, 0.0, 0.0, 40.0, 10.0);
        rect.corner_radius = 12.0;
        assert_eq!(rect.effective_corner_radius(), 5.0);
        rect.corner_radius = 3.0;
        assert_eq!(rect.effective_corner_radius(), 3.0);
    }
}
