//! SketchKit demo binary: populates a canvas, runs a short scripted
//! interaction (select, drag, resize) headlessly, and writes a PNG snapshot
//! plus a performance CSV.

use std::time::Instant;

use anyhow::Context;
use sketchkit::generator::{self, GeneratorConfig};
use sketchkit::{init_logging, Canvas, PerfMonitor, PixmapSurface};
use sketchkit_core::shared;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

const PNG_PATH: &str = "sketchkit_demo.png";
const CSV_PATH: &str = "sketchkit_perf.csv";
const SCENE_PATH: &str = "sketchkit_scene.json";

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => generator::load_config(&path)?,
        None => GeneratorConfig::default(),
    };

    let mut canvas = Canvas::new();
    let change_count = shared(0usize);
    let sink_count = change_count.clone();
    canvas.set_change_sink(Box::new(move |_shape| {
        *sink_count.borrow_mut() += 1;
    }));

    let mut rng = rand::thread_rng();
    let ids = generator::populate(&mut canvas, &config, &mut rng);
    tracing::info!(shapes = ids.len(), "canvas populated");

    let mut surface =
        PixmapSurface::new(WIDTH, HEIGHT).context("surface dimensions must be non-zero")?;
    let mut perf = PerfMonitor::new();
    perf.start();

    pump(&mut canvas, &mut surface, &mut perf, 3);

    // Scripted interaction: click-select the first shape, drag it across the
    // canvas, then grow it from its bottom-right handle.
    if let Some(center) = ids
        .first()
        .and_then(|id| canvas.shape(*id))
        .map(|shape| shape.bounding_box().center())
    {
        canvas.pointer_down(center.x, center.y, false);
        canvas.pointer_up(center.x, center.y);
        pump(&mut canvas, &mut surface, &mut perf, 1);

        canvas.pointer_down(center.x, center.y, false);
        for step in 1..=20 {
            canvas.pointer_move(center.x + 3.0 * step as f64, center.y + 2.0 * step as f64);
            pump(&mut canvas, &mut surface, &mut perf, 1);
        }
        let end = (center.x + 60.0, center.y + 40.0);
        canvas.pointer_up(end.0, end.1);

        if let Some(bounds) = canvas.selection_bounds() {
            canvas.pointer_down(bounds.max_x, bounds.max_y, false);
            for step in 1..=15 {
                canvas.pointer_move(
                    bounds.max_x + 2.0 * step as f64,
                    bounds.max_y + 2.0 * step as f64,
                );
                pump(&mut canvas, &mut surface, &mut perf, 1);
            }
            canvas.pointer_up(bounds.max_x + 30.0, bounds.max_y + 30.0);
        }
    }

    pump(&mut canvas, &mut surface, &mut perf, 5);
    perf.stop();

    tracing::info!(
        frames = perf.len(),
        changes = *change_count.borrow(),
        avg_render_ms = perf.average_render_time_ms().unwrap_or(0.0),
        "demo script finished"
    );

    save_png(&surface).with_context(|| format!("writing {PNG_PATH}"))?;

    let csv = std::fs::File::create(CSV_PATH).with_context(|| format!("creating {CSV_PATH}"))?;
    perf.export_csv(csv)
        .with_context(|| format!("writing {CSV_PATH}"))?;

    let scene =
        sketchkit_canvas::snapshot::to_json(canvas.store()).context("serializing scene")?;
    std::fs::write(SCENE_PATH, scene).with_context(|| format!("writing {SCENE_PATH}"))?;

    tracing::info!(png = PNG_PATH, csv = CSV_PATH, scene = SCENE_PATH, "outputs written");
    Ok(())
}

/// Runs `frames` tick+render passes back to back.
fn pump(canvas: &mut Canvas, surface: &mut PixmapSurface, perf: &mut PerfMonitor, frames: usize) {
    for _ in 0..frames {
        let now = Instant::now();
        canvas.tick(now);
        canvas.render(surface, now, Some(perf));
    }
}

/// Converts the premultiplied surface pixels to a straight-alpha PNG.
fn save_png(surface: &PixmapSurface) -> anyhow::Result<()> {
    let pixmap = surface.pixmap();
    let img = image::RgbaImage::from_fn(WIDTH, HEIGHT, |x, y| match pixmap.pixel(x, y) {
        Some(p) => {
            let c = p.demultiply();
            image::Rgba([c.red(), c.green(), c.blue(), c.alpha()])
        }
        None => image::Rgba([0, 0, 0, 255]),
    });
    img.save(PNG_PATH)?;
    Ok(())
}
