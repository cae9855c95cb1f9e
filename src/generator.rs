//! Demo shape generator: fills a canvas with randomly placed, randomly
//! styled shapes. Plumbing around the engine, not part of it — the engine
//! accepts any well-formed shape list.

use std::path::Path;

use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sketchkit_canvas::{Canvas, Circle, ImageShape, Rectangle, Shape};
use sketchkit_core::Color;

/// Shape layers are assigned round-robin over this many ranks.
const LAYER_RANKS: i32 = 4;

const PALETTE: [Color; 6] = [
    Color::rgb(52, 152, 219),
    Color::rgb(46, 204, 113),
    Color::rgb(231, 76, 60),
    Color::rgb(241, 196, 15),
    Color::rgb(155, 89, 182),
    Color::rgb(230, 126, 34),
];

/// Configuration for the demo generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of shapes to create.
    pub count: usize,
    /// Min/max width and height.
    pub dimension_range: (f64, f64),
    /// Min/max of the x and y origin before jitter.
    pub position_range: (f64, f64),
    /// Min/max border width; zero disables the stroke.
    pub border_width_range: (f64, f64),
    /// Maximum absolute positional jitter applied per axis.
    pub jitter: f64,
    /// Optional image files; when given, every third shape is an image
    /// cycling through them.
    pub image_urls: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 50,
            dimension_range: (20.0, 80.0),
            position_range: (0.0, 600.0),
            border_width_range: (0.0, 3.0),
            jitter: 10.0,
            image_urls: Vec::new(),
        }
    }
}

/// Reads a generator configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<GeneratorConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading generator config {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("parsing generator config {}", path.display()))
}

/// Populates the canvas per the configuration. Returns the created ids.
pub fn populate(canvas: &mut Canvas, config: &GeneratorConfig, rng: &mut impl Rng) -> Vec<u64> {
    let (dim_min, dim_max) = ordered(config.dimension_range);
    let (pos_min, pos_max) = ordered(config.position_range);
    let (bw_min, bw_max) = ordered(config.border_width_range);

    let mut ids = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let width = rng.gen_range(dim_min..=dim_max);
        let height = rng.gen_range(dim_min..=dim_max);
        let x = rng.gen_range(pos_min..=pos_max) + jitter(rng, config.jitter);
        let y = rng.gen_range(pos_min..=pos_max) + jitter(rng, config.jitter);
        let layer = i as i32 % LAYER_RANKS;
        let border_width = rng.gen_range(bw_min..=bw_max);
        let fill_color = PALETTE[rng.gen_range(0..PALETTE.len())];

        let id = canvas.generate_id();
        let shape: Shape = if !config.image_urls.is_empty() && i % 3 == 2 {
            let url = &config.image_urls[(i / 3) % config.image_urls.len()];
            let mut img = ImageShape::new(id, x, y, width, height, url.clone());
            img.layer = layer;
            img.into()
        } else if i % 2 == 0 {
            let mut rect = Rectangle::new(id, x, y, width, height);
            rect.layer = layer;
            rect.border_width = border_width;
            rect.fill_color = fill_color;
            if rng.gen_bool(0.3) {
                rect.corner_radius = rng.gen_range(2.0..=10.0);
            }
            rect.into()
        } else {
            let mut circle = Circle::new(id, x, y, width, height);
            circle.layer = layer;
            circle.border_width = border_width;
            circle.fill_color = fill_color;
            circle.into()
        };

        if canvas.add_shape(shape).is_ok() {
            ids.push(id);
        }
    }
    ids
}

fn ordered(range: (f64, f64)) -> (f64, f64) {
    if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    }
}

fn jitter(rng: &mut impl Rng, amount: f64) -> f64 {
    if amount <= 0.0 {
        0.0
    } else {
        rng.gen_range(-amount..=amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn populate_creates_the_requested_count_within_ranges() {
        let mut canvas = Canvas::new();
        let config = GeneratorConfig {
            count: 24,
            dimension_range: (10.0, 20.0),
            position_range: (0.0, 100.0),
            border_width_range: (1.0, 2.0),
            jitter: 5.0,
            image_urls: Vec::new(),
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        let ids = populate(&mut canvas, &config, &mut rng);
        assert_eq!(ids.len(), 24);
        assert_eq!(canvas.shape_count(), 24);

        for id in ids {
            let (x, y, w, h) = canvas.shape(id).expect("shape exists").frame();
            assert!((10.0..=20.0).contains(&w));
            assert!((10.0..=20.0).contains(&h));
            assert!((-5.0..=105.0).contains(&x));
            assert!((-5.0..=105.0).contains(&y));
        }
    }

    #[test]
    fn layers_cycle_round_robin() {
        let mut canvas = Canvas::new();
        let config = GeneratorConfig {
            count: 8,
            ..GeneratorConfig::default()
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let ids = populate(&mut canvas, &config, &mut rng);

        let layers: Vec<i32> = ids
            .iter()
            .map(|id| canvas.shape(*id).expect("shape exists").layer())
            .collect();
        assert_eq!(layers, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn config_parses_from_partial_json() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"count": 5, "jitter": 0.0}"#).expect("parses");
        assert_eq!(config.count, 5);
        assert_eq!(config.jitter, 0.0);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.dimension_range, (20.0, 80.0));
    }
}
