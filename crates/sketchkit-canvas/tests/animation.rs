//! Image decode and animation playback tests, exercising the real
//! filesystem loader end-to-end against generated PNG and GIF files.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use sketchkit_canvas::{Canvas, FsImageLoader, ImageCache, PixmapSurface};

fn write_png(path: &Path) {
    let img = RgbaImage::from_pixel(4, 4, Rgba([0, 128, 255, 255]));
    img.save(path).expect("png writes");
}

/// Three 4x4 frames (red, green, blue), 100 ms each.
fn write_gif(path: &Path) {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(Cursor::new(&mut bytes));
        encoder.set_repeat(Repeat::Infinite).expect("repeat set");
        for color in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
            let frame = Frame::from_parts(
                RgbaImage::from_pixel(4, 4, Rgba(color)),
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            );
            encoder.encode_frame(frame).expect("frame encodes");
        }
    }
    std::fs::write(path, bytes).expect("gif writes");
}

fn wait_until_decoded(cache: &mut ImageCache, id: u64) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if !cache.poll().is_empty() || cache.is_failed(id) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("decode of shape {id} did not finish in time");
}

#[test]
fn static_png_decodes_once_and_blits_thereafter() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("swatch.png");
    write_png(&path);

    let mut cache = ImageCache::new(Arc::new(FsImageLoader));
    cache.request(1, path.to_str().expect("utf-8 path"));
    wait_until_decoded(&mut cache, 1);

    let bitmap = cache.current_bitmap(1).expect("decoded bitmap");
    assert_eq!((bitmap.width(), bitmap.height()), (4, 4));
    assert_eq!(cache.frame_index(1), Some(0));
}

#[test]
fn gif_advances_one_frame_per_elapsed_delay() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pulse.gif");
    write_gif(&path);

    let mut cache = ImageCache::new(Arc::new(FsImageLoader));
    cache.request(1, path.to_str().expect("utf-8 path"));
    wait_until_decoded(&mut cache, 1);
    assert_eq!(cache.frame_index(1), Some(0));

    let now = Instant::now();
    cache.ensure_scheduled(1, now);

    // Before the declared delay: no advance.
    assert!(cache.advance_due(now + Duration::from_millis(50)).is_empty());
    assert_eq!(cache.frame_index(1), Some(0));

    // Past it: exactly one advance.
    let advanced = cache.advance_due(now + Duration::from_millis(150));
    assert_eq!(advanced, vec![1]);
    assert_eq!(cache.frame_index(1), Some(1));
}

#[test]
fn gif_playback_wraps_modulo_frame_count() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pulse.gif");
    write_gif(&path);

    let mut cache = ImageCache::new(Arc::new(FsImageLoader));
    cache.request(1, path.to_str().expect("utf-8 path"));
    wait_until_decoded(&mut cache, 1);

    let mut now = Instant::now();
    cache.ensure_scheduled(1, now);
    for expected in [1, 2, 0, 1] {
        now += Duration::from_millis(150);
        cache.advance_due(now);
        assert_eq!(cache.frame_index(1), Some(expected));
    }
}

#[test]
fn rescheduling_an_already_scheduled_animation_does_not_stack() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pulse.gif");
    write_gif(&path);

    let mut cache = ImageCache::new(Arc::new(FsImageLoader));
    cache.request(1, path.to_str().expect("utf-8 path"));
    wait_until_decoded(&mut cache, 1);

    let now = Instant::now();
    // Redrawing the shape re-requests scheduling every frame; only one
    // advance may be outstanding.
    cache.ensure_scheduled(1, now);
    cache.ensure_scheduled(1, now + Duration::from_millis(40));
    cache.ensure_scheduled(1, now + Duration::from_millis(80));

    let advanced = cache.advance_due(now + Duration::from_millis(350));
    assert_eq!(advanced, vec![1]);
    assert_eq!(cache.frame_index(1), Some(1));
}

#[test]
fn removing_the_shape_cancels_the_pending_advance() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pulse.gif");
    write_gif(&path);

    let mut cache = ImageCache::new(Arc::new(FsImageLoader));
    cache.request(1, path.to_str().expect("utf-8 path"));
    wait_until_decoded(&mut cache, 1);

    let now = Instant::now();
    cache.ensure_scheduled(1, now);
    cache.remove(1);

    assert!(cache
        .advance_due(now + Duration::from_millis(500))
        .is_empty());
    assert_eq!(cache.frame_index(1), None);
}

#[test]
fn canvas_tick_dirties_only_the_animated_layer() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pulse.gif");
    write_gif(&path);

    let mut canvas = Canvas::new();
    canvas.add_rectangle(100.0, 10.0, 20.0, 20.0);
    let image = canvas.add_image(10.0, 10.0, 32.0, 32.0, path.to_str().expect("utf-8 path"));

    let mut surface = PixmapSurface::new(160, 60).expect("surface");
    let start = Instant::now();
    canvas.render(&mut surface, start, None); // decode kicked off

    // Drain the decode, then render: only the image layer repaints.
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        canvas.tick(Instant::now());
        canvas.render(&mut surface, Instant::now(), None);
        if canvas.shape(image).is_some() && canvas.stats().shapes_drawn > 0 {
            break;
        }
        assert!(Instant::now() < deadline, "decode never completed");
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(canvas.stats().shapes_drawn, 1);
    assert_eq!(canvas.stats().shapes_skipped, 1);

    // A tick past the frame delay advances the animation and dirties the
    // image layer again; the rectangle stays cached.
    canvas.tick(Instant::now() + Duration::from_millis(150));
    canvas.render(&mut surface, Instant::now(), None);
    assert_eq!(canvas.stats().shapes_drawn, 1);
    assert_eq!(canvas.stats().shapes_skipped, 1);
}
