//! Rendering pipeline tests: idempotent draw commands, dirty tracking
//! across frames, and forced repaints during a manipulation.

use sketchkit_canvas::{
    draw_shape, Canvas, Circle, ImageCache, PixmapSurface, Rectangle, RecordingSurface, Shape,
};
use std::time::Instant;

#[test]
fn drawing_the_same_shape_twice_issues_identical_commands() {
    let mut rect = Rectangle::new(1, 5.0, 5.0, 40.0, 20.0);
    rect.corner_radius = 6.0;
    rect.rotation = 30.0;
    let shapes: [Shape; 2] = [rect.into(), Circle::new(2, 60.0, 5.0, 30.0, 30.0).into()];

    for shape in &shapes {
        let mut first = RecordingSurface::new();
        let mut second = RecordingSurface::new();
        let mut images = ImageCache::default();
        draw_shape(&mut first, shape, &mut images);
        draw_shape(&mut second, shape, &mut images);
        assert_eq!(first.commands, second.commands);
        assert!(!first.commands.is_empty());
    }
}

#[test]
fn second_render_of_an_unchanged_canvas_repaints_nothing() {
    let mut canvas = Canvas::new();
    for i in 0..5 {
        canvas.add_rectangle(i as f64 * 30.0, 10.0, 20.0, 20.0);
    }
    let mut surface = PixmapSurface::new(200, 50).expect("surface");

    canvas.render(&mut surface, Instant::now(), None);
    assert_eq!(canvas.stats().shapes_drawn, 5);

    canvas.render(&mut surface, Instant::now(), None);
    let stats = canvas.stats();
    assert_eq!(stats.shapes_drawn, 0);
    assert_eq!(stats.shapes_skipped, 5);
    assert_eq!(stats.frame_count, 2);
}

#[test]
fn editing_one_shape_repaints_only_that_layer() {
    let mut canvas = Canvas::new();
    let moved = canvas.add_rectangle(0.0, 0.0, 20.0, 20.0);
    canvas.add_rectangle(50.0, 0.0, 20.0, 20.0);
    let mut surface = PixmapSurface::new(100, 40).expect("surface");
    canvas.render(&mut surface, Instant::now(), None);

    let mut edited = canvas.shape(moved).expect("shape exists").clone();
    edited.translate(5.0, 5.0);
    canvas.update_shape(edited).expect("known id");

    canvas.render(&mut surface, Instant::now(), None);
    let stats = canvas.stats();
    assert_eq!(stats.shapes_drawn, 1);
    assert_eq!(stats.shapes_skipped, 1);
}

#[test]
fn manipulated_shapes_repaint_every_frame() {
    let mut canvas = Canvas::new();
    canvas.add_rectangle(10.0, 10.0, 50.0, 50.0);
    canvas.add_rectangle(100.0, 100.0, 20.0, 20.0);
    let mut surface = PixmapSurface::new(200, 200).expect("surface");
    canvas.render(&mut surface, Instant::now(), None);

    canvas.pointer_down(30.0, 30.0, false);
    canvas.pointer_up(30.0, 30.0);
    canvas.pointer_down(30.0, 30.0, false); // Moving

    for step in 1..4 {
        canvas.pointer_move(30.0 + step as f64, 30.0);
        canvas.render(&mut surface, Instant::now(), None);
        // The dragged shape repaints each frame; the bystander stays cached.
        assert_eq!(canvas.stats().shapes_drawn, 1);
        assert_eq!(canvas.stats().shapes_skipped, 1);
    }
    canvas.pointer_up(33.0, 30.0);
}

#[test]
fn selection_overlay_is_painted_over_the_composition() {
    let mut canvas = Canvas::new();
    canvas.set_background(sketchkit_core::Color::rgb(30, 30, 30));
    let id = canvas.add_rectangle(20.0, 20.0, 30.0, 30.0);
    let mut surface = PixmapSurface::new(100, 100).expect("surface");

    canvas.pointer_down(35.0, 35.0, false);
    canvas.pointer_up(35.0, 35.0);
    assert!(canvas.selection().contains(id));
    canvas.render(&mut surface, Instant::now(), None);

    // A white-filled handle sits on the padded bounds corner (17, 17); on
    // the dark background the only white there is the handle.
    let pixel = surface.pixmap().pixel(17, 17).expect("pixel in range");
    assert_eq!(
        (pixel.red(), pixel.green(), pixel.blue()),
        (255, 255, 255)
    );
}

fn solid_rect(canvas: &mut Canvas, x: f64, y: f64, size: f64, layer: i32, fill: sketchkit_core::Color) -> u64 {
    let id = canvas.generate_id();
    let mut rect = Rectangle::new(id, x, y, size, size);
    rect.layer = layer;
    rect.border_width = 0.0;
    rect.fill_color = fill;
    canvas.add_shape(rect.into()).expect("fresh id");
    id
}

#[test]
fn removed_shape_disappears_from_the_next_frame() {
    let mut canvas = Canvas::new();
    canvas.set_background(sketchkit_core::Color::WHITE);
    let id = solid_rect(&mut canvas, 4.0, 4.0, 8.0, 0, sketchkit_core::Color::rgb(255, 0, 0));

    let mut surface = PixmapSurface::new(16, 16).expect("surface");
    canvas.render(&mut surface, Instant::now(), None);
    let painted = surface.pixmap().pixel(8, 8).expect("pixel");
    assert_eq!(painted.red(), 255);

    canvas.remove_shape(id);
    canvas.render(&mut surface, Instant::now(), None);
    let cleared = surface.pixmap().pixel(8, 8).expect("pixel");
    assert_eq!(
        (cleared.red(), cleared.green(), cleared.blue()),
        (255, 255, 255)
    );
}

#[test]
fn layers_compose_in_paint_order() {
    let mut canvas = Canvas::new();
    canvas.set_background(sketchkit_core::Color::WHITE);
    solid_rect(&mut canvas, 0.0, 0.0, 16.0, 1, sketchkit_core::Color::rgb(255, 0, 0));
    solid_rect(&mut canvas, 0.0, 0.0, 16.0, 2, sketchkit_core::Color::rgb(0, 0, 255));

    let mut surface = PixmapSurface::new(16, 16).expect("surface");
    canvas.render(&mut surface, Instant::now(), None);

    let pixel = surface.pixmap().pixel(8, 8).expect("pixel");
    assert_eq!((pixel.red(), pixel.blue()), (0, 255));
}
