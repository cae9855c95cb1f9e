//! Drawing-surface abstraction and its implementations.
//!
//! The engine issues immediate-mode commands against [`DrawSurface`]:
//! fill/stroke of rounded rects, ellipses and circles, dashed stroking, and
//! an image blit. [`PixmapSurface`] renders with tiny-skia;
//! [`RecordingSurface`] captures the command stream for tests (the render
//! pass must be idempotent: identical inputs, identical commands).

use sketchkit_core::{Bounds, Color, Point};
use tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, StrokeDash, Transform,
};

/// Stroke parameters: color, line width, and an optional (on, off) dash
/// pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<(f64, f64)>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f64, dash: (f64, f64)) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// Decoded pixel content ready to blit. Pixels are stored premultiplied, as
/// tiny-skia expects.
#[derive(Clone)]
pub struct Bitmap {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Bitmap {
    /// Wraps decoded RGBA pixels. Returns `None` for zero-sized input.
    pub fn from_rgba_image(image: &image::RgbaImage) -> Option<Self> {
        let mut pixmap = Pixmap::new(image.width(), image.height())?;
        for (src, dst) in image.pixels().zip(pixmap.pixels_mut()) {
            let [r, g, b, a] = src.0;
            *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Some(Self { pixmap })
    }

    /// Wraps an already-premultiplied pixmap.
    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn as_pixmap(&self) -> tiny_skia::PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

/// Abstract 2D immediate-mode drawing surface.
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Color);
    fn fill_rounded_rect(&mut self, rect: Bounds, radius: f64, rotation: f64, color: Color);
    fn stroke_rounded_rect(&mut self, rect: Bounds, radius: f64, rotation: f64, style: &StrokeStyle);
    fn fill_ellipse(&mut self, rect: Bounds, rotation: f64, color: Color);
    fn stroke_ellipse(&mut self, rect: Bounds, rotation: f64, style: &StrokeStyle);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    fn stroke_circle(&mut self, center: Point, radius: f64, style: &StrokeStyle);
    fn blit(&mut self, bitmap: &Bitmap, rect: Bounds, rotation: f64);
}

/// tiny-skia backed surface.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    /// Creates a surface. Returns `None` for zero dimensions, so a missing
    /// context degrades to skipped draws rather than an error.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consumes the surface, yielding its pixels as a blittable bitmap.
    pub fn into_bitmap(self) -> Bitmap {
        Bitmap::from_pixmap(self.pixmap)
    }

    /// Raw premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    fn fill(&mut self, path: Option<Path>, rotation_transform: Transform, color: Color) {
        let Some(path) = path else { return };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, rotation_transform, None);
    }

    fn stroke(&mut self, path: Option<Path>, rotation_transform: Transform, style: &StrokeStyle) {
        let Some(path) = path else { return };
        if style.width <= 0.0 {
            return;
        }
        let mut paint = Paint::default();
        paint.set_color_rgba8(style.color.r, style.color.g, style.color.b, style.color.a);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: style.width as f32,
            dash: style
                .dash
                .and_then(|(on, off)| StrokeDash::new(vec![on as f32, off as f32], 0.0)),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, rotation_transform, None);
    }
}

impl DrawSurface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn fill_rounded_rect(&mut self, rect: Bounds, radius: f64, rotation: f64, color: Color) {
        self.fill(
            rounded_rect_path(&rect, radius),
            rotation_about_center(&rect, rotation),
            color,
        );
    }

    fn stroke_rounded_rect(
        &mut self,
        rect: Bounds,
        radius: f64,
        rotation: f64,
        style: &StrokeStyle,
    ) {
        self.stroke(
            rounded_rect_path(&rect, radius),
            rotation_about_center(&rect, rotation),
            style,
        );
    }

    fn fill_ellipse(&mut self, rect: Bounds, rotation: f64, color: Color) {
        self.fill(
            ellipse_path(&rect),
            rotation_about_center(&rect, rotation),
            color,
        );
    }

    fn stroke_ellipse(&mut self, rect: Bounds, rotation: f64, style: &StrokeStyle) {
        self.stroke(
            ellipse_path(&rect),
            rotation_about_center(&rect, rotation),
            style,
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.fill(
            PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32),
            Transform::identity(),
            color,
        );
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &StrokeStyle) {
        self.stroke(
            PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32),
            Transform::identity(),
            style,
        );
    }

    fn blit(&mut self, bitmap: &Bitmap, rect: Bounds, rotation: f64) {
        if rect.is_empty() || bitmap.width() == 0 || bitmap.height() == 0 {
            return;
        }
        let sx = (rect.width() / bitmap.width() as f64) as f32;
        let sy = (rect.height() / bitmap.height() as f64) as f32;
        let mut transform = Transform::from_scale(sx, sy)
            .post_translate(rect.min_x as f32, rect.min_y as f32);
        if rotation.abs() > 1e-6 {
            let center = rect.center();
            transform = transform.post_concat(Transform::from_rotate_at(
                rotation as f32,
                center.x as f32,
                center.y as f32,
            ));
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            bitmap.as_pixmap(),
            &PixmapPaint::default(),
            transform,
            None,
        );
    }
}

fn rotation_about_center(rect: &Bounds, rotation_deg: f64) -> Transform {
    if rotation_deg.abs() < 1e-6 {
        return Transform::identity();
    }
    let center = rect.center();
    Transform::from_rotate_at(rotation_deg as f32, center.x as f32, center.y as f32)
}

fn rounded_rect_path(rect: &Bounds, radius: f64) -> Option<Path> {
    if rect.is_empty() {
        return None;
    }
    let (x, y) = (rect.min_x as f32, rect.min_y as f32);
    let (w, h) = (rect.width() as f32, rect.height() as f32);
    let r = radius
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0)
        .max(0.0) as f32;

    if r <= 0.0 {
        return Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

fn ellipse_path(rect: &Bounds) -> Option<Path> {
    let skia_rect = Rect::from_xywh(
        rect.min_x as f32,
        rect.min_y as f32,
        rect.width() as f32,
        rect.height() as f32,
    )?;
    PathBuilder::from_oval(skia_rect)
}

/// One recorded surface command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRoundedRect {
        rect: Bounds,
        radius: f64,
        rotation: f64,
        color: Color,
    },
    StrokeRoundedRect {
        rect: Bounds,
        radius: f64,
        rotation: f64,
        style: StrokeStyle,
    },
    FillEllipse {
        rect: Bounds,
        rotation: f64,
        color: Color,
    },
    StrokeEllipse {
        rect: Bounds,
        rotation: f64,
        style: StrokeStyle,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        style: StrokeStyle,
    },
    Blit {
        width: u32,
        height: u32,
        rect: Bounds,
        rotation: f64,
    },
}

/// Test double that records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (0, 0)
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rounded_rect(&mut self, rect: Bounds, radius: f64, rotation: f64, color: Color) {
        self.commands.push(DrawCommand::FillRoundedRect {
            rect,
            radius,
            rotation,
            color,
        });
    }

    fn stroke_rounded_rect(
        &mut self,
        rect: Bounds,
        radius: f64,
        rotation: f64,
        style: &StrokeStyle,
    ) {
        self.commands.push(DrawCommand::StrokeRoundedRect {
            rect,
            radius,
            rotation,
            style: style.clone(),
        });
    }

    fn fill_ellipse(&mut self, rect: Bounds, rotation: f64, color: Color) {
        self.commands.push(DrawCommand::FillEllipse {
            rect,
            rotation,
            color,
        });
    }

    fn stroke_ellipse(&mut self, rect: Bounds, rotation: f64, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeEllipse {
            rect,
            rotation,
            style: style.clone(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            style: style.clone(),
        });
    }

    fn blit(&mut self, bitmap: &Bitmap, rect: Bounds, rotation: f64) {
        self.commands.push(DrawCommand::Blit {
            width: bitmap.width(),
            height: bitmap.height(),
            rect,
            rotation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(PixmapSurface::new(0, 10).is_none());
        assert!(PixmapSurface::new(64, 64).is_some());
    }

    #[test]
    fn fill_touches_pixels() {
        let mut surface = PixmapSurface::new(16, 16).unwrap();
        surface.clear(Color::WHITE);
        surface.fill_rounded_rect(
            Bounds::from_xywh(2.0, 2.0, 12.0, 12.0),
            0.0,
            0.0,
            Color::rgb(255, 0, 0),
        );
        let center = surface.pixmap().pixel(8, 8).expect("pixel in range");
        assert_eq!(center.red(), 255);
        assert_eq!(center.green(), 0);
    }

    #[test]
    fn empty_geometry_is_a_noop() {
        let mut surface = PixmapSurface::new(8, 8).unwrap();
        surface.clear(Color::WHITE);
        let before = surface.data().to_vec();
        surface.fill_rounded_rect(Bounds::from_xywh(2.0, 2.0, 0.0, 4.0), 0.0, 0.0, Color::BLACK);
        surface.stroke_ellipse(
            Bounds::from_xywh(2.0, 2.0, 0.0, 0.0),
            0.0,
            &StrokeStyle::solid(Color::BLACK, 1.0),
        );
        assert_eq!(surface.data(), before.as_slice());
    }

    #[test]
    fn bitmap_from_rgba_preserves_dimensions() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let bitmap = Bitmap::from_rgba_image(&img).expect("non-empty image");
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
    }

    #[test]
    fn recording_surface_captures_commands_in_order() {
        let mut surface = RecordingSurface::new();
        surface.clear(Color::WHITE);
        surface.fill_circle(Point::new(1.0, 2.0), 3.0, Color::BLACK);
        assert_eq!(surface.commands.len(), 2);
        assert!(matches!(surface.commands[0], DrawCommand::Clear(_)));
    }
}
