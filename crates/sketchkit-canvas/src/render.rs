//! Stateless shape painter and selection overlay.
//!
//! `draw_shape` is a pure function of shape → surface commands (plus decode
//! requests into the image cache); drawing the same shape twice issues the
//! same commands, which the scheduler's dirty-bit protocol depends on.

use sketchkit_core::constants::{
    HANDLE_DRAW_RADIUS, HANDLE_STROKE_WIDTH, OUTLINE_CORNER_RADIUS, OUTLINE_DASH,
};
use sketchkit_core::{Bounds, Color};

use crate::hit_test::Handle;
use crate::images::ImageCache;
use crate::model::Shape;
use crate::surface::{DrawSurface, StrokeStyle};

/// Stroke color of the selection outline and handle rings.
pub const SELECTION_COLOR: Color = Color::rgb(255, 235, 59);

/// Stroke color of the hover outline.
pub const HOVER_COLOR: Color = Color::rgba(255, 235, 59, 140);

/// Draws one shape onto the surface.
///
/// Fill is applied only when `filled` is set; stroke only when
/// `border_width > 0`. An image shape whose content is not yet cached issues
/// a decode request and draws nothing this frame; the redraw triggered by
/// decode completion picks up the bitmap. Malformed geometry (negative or
/// zero extents) degrades to skipped draws, never a panic.
pub fn draw_shape(surface: &mut dyn DrawSurface, shape: &Shape, images: &mut ImageCache) {
    match shape {
        Shape::Rectangle(rect) => {
            let bounds = rect.bounding_box();
            let radius = rect.effective_corner_radius();
            if rect.filled {
                surface.fill_rounded_rect(bounds, radius, rect.rotation, rect.fill_color);
            }
            if rect.border_width > 0.0 {
                surface.stroke_rounded_rect(
                    bounds,
                    radius,
                    rect.rotation,
                    &StrokeStyle::solid(rect.border_color, rect.border_width),
                );
            }
        }
        Shape::Circle(circle) => {
            let bounds = circle.bounding_box();
            if circle.filled {
                surface.fill_ellipse(bounds, circle.rotation, circle.fill_color);
            }
            if circle.border_width > 0.0 {
                surface.stroke_ellipse(
                    bounds,
                    circle.rotation,
                    &StrokeStyle::solid(circle.border_color, circle.border_width),
                );
            }
        }
        Shape::Image(img) => {
            images.request(img.id, &img.url);
            if let Some(bitmap) = images.current_bitmap(img.id) {
                surface.blit(bitmap, img.bounding_box(), img.rotation);
            }
        }
    }
}

/// Strokes a dashed rounded rectangle around the (already padded) selection
/// bounds and, when `with_handles`, the four corner handles: white fill with
/// a black ring, one per corner in TL, TR, BL, BR order.
pub fn draw_outline(
    surface: &mut dyn DrawSurface,
    bounds: &Bounds,
    color: Color,
    with_handles: bool,
) {
    surface.stroke_rounded_rect(
        *bounds,
        OUTLINE_CORNER_RADIUS,
        0.0,
        &StrokeStyle::dashed(color, 1.0, OUTLINE_DASH),
    );

    if with_handles {
        for handle in Handle::ALL {
            let center = handle.position(bounds);
            surface.fill_circle(center, HANDLE_DRAW_RADIUS, Color::WHITE);
            surface.stroke_circle(
                center,
                HANDLE_DRAW_RADIUS,
                &StrokeStyle::solid(Color::BLACK, HANDLE_STROKE_WIDTH),
            );
        }
    }
}
