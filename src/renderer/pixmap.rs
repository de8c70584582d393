//! Software rasterizer backend built on tiny-skia.

use std::path::Path;

use image::RgbaImage;
use resvg::tiny_skia::{
    self, FillRule, FilterQuality, GradientStop, LineCap, LinearGradient, Paint, PathBuilder,
    Pattern, Pixmap, Point, SpreadMode, Stroke, StrokeDash,
};

use super::{ArcStroke, BitmapPaint, Brush, Canvas, Fill};
use crate::bitmap::{demultiply_pixmap, Bitmap};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::layout::Rect;
use crate::transform::Transform;

/// An offscreen RGBA surface.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    transform_stack: Vec<Transform>,
    transform: Transform,
    /// Premultiplied copy of the last bitmap drawn, reused across frames
    bitmap_cache: Option<(Bitmap, Pixmap)>,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(Error::InvalidSurface { width, height })?;
        Ok(Self {
            pixmap,
            transform_stack: Vec::new(),
            transform: Transform::IDENTITY,
            bitmap_cache: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole surface and reset the transform.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(skia_color(color));
        self.transform_stack.clear();
        self.transform = Transform::IDENTITY;
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::from_rgba8(
            pixel.red(),
            pixel.green(),
            pixel.blue(),
            pixel.alpha(),
        ))
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        demultiply_pixmap(self.pixmap.as_ref())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgba_image().save(path)?;
        Ok(())
    }
}

impl Canvas for PixmapCanvas {
    fn save(&mut self) {
        self.transform_stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.transform_stack.pop() {
            self.transform = transform;
        }
    }

    fn rotate(&mut self, degrees: f32, pivot: (f32, f32)) {
        self.transform = self
            .transform
            .then(&Transform::rotate_about(degrees, pivot.0, pivot.1));
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, fill: &Fill) {
        let Some(path) = PathBuilder::from_circle(center.0, center.1, radius) else {
            return;
        };
        let transform = self.transform.to_skia();

        match fill {
            Fill::Solid(color) => {
                let mut paint = Paint::default();
                paint.set_color(skia_color(*color));
                paint.anti_alias = true;
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
            Fill::Bitmap(image) => {
                let Some(source) = cached_pixmap(&mut self.bitmap_cache, &image.bitmap) else {
                    return;
                };
                let paint = Paint {
                    shader: bitmap_shader(source, image),
                    anti_alias: true,
                    ..Paint::default()
                };
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
        }
    }

    fn stroke_arc(&mut self, oval: Rect, start_angle: f32, sweep_angle: f32, stroke: &ArcStroke) {
        let Some(path) = arc_path(oval, start_angle, sweep_angle) else {
            return;
        };

        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        match stroke.brush {
            Brush::Solid(color) => paint.set_color(skia_color(color)),
            Brush::LinearGradient {
                start,
                end,
                start_color,
                end_color,
            } => {
                match LinearGradient::new(
                    Point::from_xy(start.0, start.1),
                    Point::from_xy(end.0, end.1),
                    vec![
                        GradientStop::new(0.0, skia_color(start_color)),
                        GradientStop::new(1.0, skia_color(end_color)),
                    ],
                    SpreadMode::Pad,
                    tiny_skia::Transform::identity(),
                ) {
                    Some(shader) => paint.shader = shader,
                    // Degenerate gradient line
                    None => paint.set_color(skia_color(start_color)),
                }
            }
        }

        let skia_stroke = Stroke {
            width: stroke.width,
            line_cap: LineCap::Round,
            dash: stroke
                .dash
                .and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0)),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &skia_stroke, self.transform.to_skia(), None);
    }

    fn draw_bitmap(&mut self, paint: &BitmapPaint, clip: Rect) {
        let Some(rect) = tiny_skia::Rect::from_xywh(clip.x, clip.y, clip.width, clip.height) else {
            return;
        };
        let Some(source) = cached_pixmap(&mut self.bitmap_cache, &paint.bitmap) else {
            return;
        };
        let skia_paint = Paint {
            shader: bitmap_shader(source, paint),
            ..Paint::default()
        };
        self.pixmap
            .fill_rect(rect, &skia_paint, self.transform.to_skia(), None);
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn bitmap_shader<'a>(source: &'a Pixmap, paint: &BitmapPaint) -> tiny_skia::Shader<'a> {
    Pattern::new(
        source.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bilinear,
        1.0,
        paint.transform.to_skia(),
    )
}

fn cached_pixmap<'a>(cache: &'a mut Option<(Bitmap, Pixmap)>, bitmap: &Bitmap) -> Option<&'a Pixmap> {
    let hit = matches!(cache, Some((cached, _)) if cached.ptr_eq(bitmap));
    if !hit {
        log::trace!("uploading {}x{} bitmap", bitmap.width(), bitmap.height());
        *cache = bitmap.to_pixmap().map(|pixmap| (bitmap.clone(), pixmap));
    }
    cache.as_ref().map(|(_, pixmap)| pixmap)
}

/// Path along the ellipse inscribed in `oval`, approximated with one cubic
/// per quarter turn or less. Sweeps are clamped to a full turn.
pub(crate) fn arc_path(oval: Rect, start_angle: f32, sweep_angle: f32) -> Option<tiny_skia::Path> {
    if sweep_angle == 0.0 || oval.width <= 0.0 || oval.height <= 0.0 {
        return None;
    }

    let sweep = sweep_angle.clamp(-360.0, 360.0);
    let (cx, cy) = oval.center();
    let rx = oval.width / 2.0;
    let ry = oval.height / 2.0;

    let segments = (sweep.abs() / 90.0).ceil().max(1.0) as usize;
    let step = (sweep / segments as f32).to_radians();
    // Control point distance for a unit circle arc of `step` radians
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut angle = start_angle.to_radians();
    let mut builder = PathBuilder::new();
    builder.move_to(cx + rx * angle.cos(), cy + ry * angle.sin());
    for _ in 0..segments {
        let next = angle + step;
        let (sin0, cos0) = angle.sin_cos();
        let (sin1, cos1) = next.sin_cos();
        builder.cubic_to(
            cx + rx * (cos0 - k * sin0),
            cy + ry * (sin0 + k * cos0),
            cx + rx * (cos1 + k * sin1),
            cy + ry * (sin1 - k * cos1),
            cx + rx * cos1,
            cy + ry * sin1,
        );
        angle = next;
    }
    if sweep.abs() >= 360.0 {
        builder.close();
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_surface_is_rejected() {
        assert!(matches!(
            PixmapCanvas::new(0, 10),
            Err(Error::InvalidSurface {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_full_arc_spans_oval() {
        let oval = Rect::new(10.0, 20.0, 40.0, 40.0);
        let bounds = arc_path(oval, 270.0, 360.0).unwrap().bounds();
        assert!((bounds.left() - 10.0).abs() < 0.5);
        assert!((bounds.right() - 50.0).abs() < 0.5);
        assert!((bounds.top() - 20.0).abs() < 0.5);
        assert!((bounds.bottom() - 60.0).abs() < 0.5);
    }

    #[test]
    fn test_quarter_arc_from_top() {
        // 12 o'clock to 3 o'clock
        let oval = Rect::new(0.0, 0.0, 100.0, 100.0);
        let bounds = arc_path(oval, 270.0, 90.0).unwrap().bounds();
        assert!((bounds.left() - 50.0).abs() < 0.5);
        assert!((bounds.top() - 0.0).abs() < 0.5);
        assert!((bounds.right() - 100.0).abs() < 0.5);
        assert!((bounds.bottom() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_empty_arc() {
        assert!(arc_path(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 0.0).is_none());
        assert!(arc_path(Rect::new(0.0, 0.0, 0.0, 10.0), 0.0, 90.0).is_none());
    }

    #[test]
    fn test_solid_circle_pixels() {
        let mut canvas = PixmapCanvas::new(20, 20).unwrap();
        canvas.fill_circle((10.0, 10.0), 8.0, &Fill::Solid(Color::from_hex(0x00FF00)));
        assert_eq!(canvas.pixel(10, 10).unwrap().to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(canvas.pixel(0, 0).unwrap().to_rgba8(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_bitmap_circle_uses_shader_transform() {
        let mut canvas = PixmapCanvas::new(20, 20).unwrap();
        let paint = BitmapPaint {
            bitmap: Bitmap::solid(2, 2, Color::from_hex(0xFF0000)).unwrap(),
            transform: Transform::scale(10.0),
        };
        canvas.fill_circle((10.0, 10.0), 10.0, &Fill::Bitmap(paint));
        assert_eq!(canvas.pixel(10, 10).unwrap().to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(0, 0).unwrap().to_rgba8()[3], 0);
    }

    #[test]
    fn test_clear_and_export() {
        let mut canvas = PixmapCanvas::new(3, 2).unwrap();
        canvas.clear(Color::WHITE);
        let image = canvas.to_rgba_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [255, 255, 255, 255]);
    }
}
