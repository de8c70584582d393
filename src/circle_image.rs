//! The circle image widget core.
//!
//! [`CircleImageRenderer`] owns the configuration, the current bitmap, the
//! derived geometry and paints, and the border animation. It never owns a
//! timer: the host feeds it time with [`advance`](CircleImageRenderer::advance)
//! and polls [`take_redraw_request`](CircleImageRenderer::take_redraw_request)
//! to schedule frames.

use std::time::Duration;

use crate::animation::{AnimationState, BorderAnimation, TimingFunction};
use crate::bitmap::{Bitmap, ContentFit, ImageSource};
use crate::color::Color;
use crate::config::{normalize_border_colors, BorderStyle, CircleImageConfig};
use crate::error::{Error, Result};
use crate::invalidation::ChangeFlags;
use crate::layout::{center_crop, compute_geometry, Geometry, Padding, Rect, Size};
use crate::renderer::{
    render, BitmapPaint, Canvas, ColorFilter, Frame, ImagePaint, TrackPaints,
};

pub struct CircleImageRenderer {
    config: CircleImageConfig,
    size: Size,
    padding: Padding,
    visible: bool,
    circular: bool,
    color_filter: Option<ColorFilter>,
    bitmap: Option<Bitmap>,
    geometry: Geometry,
    image_paint: ImagePaint,
    track_paints: Option<TrackPaints>,
    animation: BorderAnimation,
    flags: ChangeFlags,
}

impl Default for CircleImageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CircleImageRenderer {
    pub fn new() -> Self {
        Self::with_config(CircleImageConfig::default())
    }

    pub fn with_config(mut config: CircleImageConfig) -> Self {
        config.border_colors = normalize_border_colors(std::mem::take(&mut config.border_colors))
            .unwrap_or_else(|| CircleImageConfig::default().border_colors);

        let animation = BorderAnimation::new(config.border_timings());
        let mut renderer = Self {
            config,
            size: Size::default(),
            padding: Padding::default(),
            visible: true,
            circular: true,
            color_filter: None,
            bitmap: None,
            geometry: Geometry::default(),
            image_paint: ImagePaint::None,
            track_paints: None,
            animation,
            flags: ChangeFlags::NEEDS_SETUP,
        };
        renderer.update_animation();
        renderer
    }

    pub fn config(&self) -> &CircleImageConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub fn image_paint(&self) -> &ImagePaint {
        &self.image_paint
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    // -- Layout inputs --

    pub fn set_size(&mut self, size: Size) {
        if self.size == size {
            return;
        }
        self.size = size;
        self.setup();
    }

    pub fn set_padding(&mut self, padding: Padding) {
        if self.padding == padding {
            return;
        }
        self.padding = padding;
        self.setup();
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.update_animation();
    }

    // -- Image --

    /// Convert `source` to a bitmap and display it. A source that cannot be
    /// converted clears the image; the border keeps drawing.
    pub fn set_image(&mut self, source: impl Into<ImageSource>) {
        let bitmap = Bitmap::from_source(&source.into());
        self.replace_bitmap(bitmap);
    }

    pub fn set_bitmap(&mut self, bitmap: Bitmap) {
        if self.bitmap.as_ref().is_some_and(|current| current.ptr_eq(&bitmap)) {
            return;
        }
        self.replace_bitmap(Some(bitmap));
    }

    pub fn clear_image(&mut self) {
        if self.bitmap.is_none() {
            return;
        }
        self.replace_bitmap(None);
    }

    fn replace_bitmap(&mut self, bitmap: Option<Bitmap>) {
        self.bitmap = bitmap;
        self.setup();
    }

    pub fn color_filter(&self) -> Option<&ColorFilter> {
        self.color_filter.as_ref()
    }

    /// Filter applied to the circular image only.
    pub fn set_color_filter(&mut self, filter: Option<ColorFilter>) {
        if self.color_filter == filter {
            return;
        }
        self.color_filter = filter;
        self.update_image_paint();
        self.request_redraw();
    }

    pub fn is_circular_transformation_disabled(&self) -> bool {
        !self.circular
    }

    /// With the transformation disabled the image is center-cropped into the
    /// padded bounds and no border is drawn.
    pub fn set_disable_circular_transformation(&mut self, disable: bool) {
        if self.circular != disable {
            return;
        }
        self.circular = !disable;
        self.setup();
    }

    /// Always [`ContentFit::Cover`].
    pub fn content_fit(&self) -> ContentFit {
        ContentFit::Cover
    }

    pub fn set_content_fit(&mut self, fit: ContentFit) -> Result<()> {
        if fit != ContentFit::Cover {
            return Err(Error::UnsupportedContentFit(fit));
        }
        Ok(())
    }

    pub fn adjust_view_bounds(&self) -> bool {
        false
    }

    pub fn set_adjust_view_bounds(&mut self, adjust: bool) -> Result<()> {
        if adjust {
            return Err(Error::AdjustViewBoundsUnsupported);
        }
        Ok(())
    }

    // -- Border configuration --

    pub fn border_width(&self) -> u32 {
        self.config.border_width
    }

    pub fn set_border_width(&mut self, width: u32) {
        if self.config.border_width == width {
            return;
        }
        self.config.border_width = width;
        self.setup();
    }

    pub fn is_border_overlay(&self) -> bool {
        self.config.border_overlay
    }

    pub fn set_border_overlay(&mut self, overlay: bool) {
        if self.config.border_overlay == overlay {
            return;
        }
        self.config.border_overlay = overlay;
        self.setup();
    }

    pub fn border_padding(&self) -> u32 {
        self.config.border_padding
    }

    pub fn set_border_padding(&mut self, padding: u32) {
        if self.config.border_padding == padding {
            return;
        }
        self.config.border_padding = padding;
        self.setup();
    }

    pub fn circle_background_color(&self) -> Color {
        self.config.circle_background_color
    }

    pub fn set_circle_background_color(&mut self, color: Color) {
        if self.config.circle_background_color == color {
            return;
        }
        self.config.circle_background_color = color;
        self.request_redraw();
    }

    pub fn border_style(&self) -> BorderStyle {
        self.config.border_style
    }

    pub fn set_border_style(&mut self, style: BorderStyle) {
        if self.config.border_style == style {
            return;
        }
        self.config.border_style = style;
        self.update_animation();
        self.request_redraw();
    }

    pub fn border_colors(&self) -> &[Color] {
        &self.config.border_colors
    }

    /// Replace the still border colors, keeping at most
    /// [`MAX_BORDER_COLORS`](crate::config::MAX_BORDER_COLORS). Empty input
    /// is ignored.
    pub fn set_border_colors(&mut self, colors: impl Into<Vec<Color>>) {
        let Some(colors) = normalize_border_colors(colors.into()) else {
            log::debug!("ignoring empty border color list");
            return;
        };
        if self.config.border_colors == colors {
            return;
        }
        self.config.border_colors = colors;
        self.request_redraw();
    }

    pub fn border_track_start_color(&self) -> Color {
        self.config.border_track_start_color
    }

    pub fn set_border_track_start_color(&mut self, color: Color) {
        if self.config.border_track_start_color == color {
            return;
        }
        self.config.border_track_start_color = color;
        self.invalidate_track_paints();
    }

    pub fn border_track_end_color(&self) -> Color {
        self.config.border_track_end_color
    }

    pub fn set_border_track_end_color(&mut self, color: Color) {
        if self.config.border_track_end_color == color {
            return;
        }
        self.config.border_track_end_color = color;
        self.invalidate_track_paints();
    }

    pub fn border_rotate_duration_ms(&self) -> u32 {
        self.config.border_rotate_duration_ms
    }

    /// Applies to the running spin without restarting it.
    pub fn set_border_rotate_duration_ms(&mut self, duration_ms: u32) {
        if self.config.border_rotate_duration_ms == duration_ms {
            return;
        }
        self.config.border_rotate_duration_ms = duration_ms;
        self.animation
            .set_rotate_duration(Duration::from_millis(u64::from(duration_ms)));
    }

    pub fn border_track_duration_ms(&self) -> u32 {
        self.config.border_track_duration_ms
    }

    /// Applies to the running growth stages without restarting them.
    pub fn set_border_track_duration_ms(&mut self, duration_ms: u32) {
        if self.config.border_track_duration_ms == duration_ms {
            return;
        }
        self.config.border_track_duration_ms = duration_ms;
        self.animation
            .set_track_duration(Duration::from_millis(u64::from(duration_ms)));
    }

    pub fn solid_track_easing(&self) -> TimingFunction {
        self.config.solid_track_easing
    }

    pub fn set_solid_track_easing(&mut self, easing: TimingFunction) {
        self.config.solid_track_easing = easing;
        self.animation.set_solid_easing(easing);
    }

    // -- Frame loop --

    /// Step the border animation by `delta`. Returns whether a redraw is
    /// needed.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.animation.advance(delta) {
            self.request_redraw();
            return true;
        }
        false
    }

    /// Consume a pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        self.flags.take(ChangeFlags::NEEDS_PAINT)
    }

    /// Draw the current frame, running a pending setup first.
    pub fn paint<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        if self.flags.contains(ChangeFlags::NEEDS_SETUP) {
            self.setup();
        }
        self.flags.remove(ChangeFlags::NEEDS_PAINT);

        let frame = Frame {
            geometry: &self.geometry,
            circular: self.circular,
            config: &self.config,
            image: &self.image_paint,
            tracks: self.track_paints.as_ref(),
            state: self.animation.state(),
        };
        render(canvas, &frame);
    }

    // -- Internals --

    fn request_redraw(&mut self) {
        self.flags.insert(ChangeFlags::NEEDS_PAINT);
    }

    fn invalidate_track_paints(&mut self) {
        self.track_paints = None;
        self.flags
            .insert(ChangeFlags::NEEDS_SETUP | ChangeFlags::NEEDS_PAINT);
    }

    fn update_animation(&mut self) {
        let should_run = self.visible && self.config.border_style == BorderStyle::Rotate;
        let changed = if should_run {
            self.animation.start()
        } else {
            self.animation.stop()
        };
        if changed {
            self.request_redraw();
        }
    }

    /// Recompute geometry and paints from the current size, padding, border
    /// and bitmap.
    fn setup(&mut self) {
        if self.size.is_zero() {
            log::debug!("setup deferred, widget has no size yet");
            return;
        }

        self.geometry = compute_geometry(self.size, self.padding, self.config.border_metrics());
        self.track_paints = Some(TrackPaints::new(&self.config, self.size));
        self.update_image_paint();
        self.flags.remove(ChangeFlags::NEEDS_SETUP);
        self.request_redraw();

        log::debug!(
            "setup {}x{}: drawable {:?} radius {}",
            self.size.width,
            self.size.height,
            self.geometry.drawable,
            self.geometry.drawable_radius
        );
    }

    fn update_image_paint(&mut self) {
        let Some(bitmap) = &self.bitmap else {
            self.image_paint = ImagePaint::None;
            return;
        };

        self.image_paint = if self.circular {
            let bitmap = match &self.color_filter {
                Some(filter) => filter.apply(bitmap),
                None => bitmap.clone(),
            };
            ImagePaint::Circle(crop_into(bitmap, self.geometry.drawable))
        } else {
            ImagePaint::Rectangular(crop_into(bitmap.clone(), self.geometry.bounds))
        };
    }
}

fn crop_into(bitmap: Bitmap, target: Rect) -> BitmapPaint {
    let (width, height) = bitmap.dimensions();
    let transform = center_crop(width, height, target).to_transform();
    BitmapPaint { bitmap, transform }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, Fill, PaintContext};

    fn sized(config: CircleImageConfig) -> CircleImageRenderer {
        let mut renderer = CircleImageRenderer::with_config(config);
        renderer.set_size(Size::new(200.0, 200.0));
        renderer.take_redraw_request();
        renderer
    }

    #[test]
    fn test_zero_size_skips_setup() {
        let mut renderer = CircleImageRenderer::with_config(CircleImageConfig::new().border_width(10));
        renderer.set_bitmap(Bitmap::solid(4, 4, Color::WHITE).unwrap());
        assert_eq!(*renderer.geometry(), Geometry::default());
        assert!(matches!(renderer.image_paint(), ImagePaint::None));

        renderer.set_size(Size::new(200.0, 200.0));
        assert_eq!(renderer.geometry().drawable, Rect::from_ltrb(9.0, 9.0, 191.0, 191.0));
        assert!(matches!(renderer.image_paint(), ImagePaint::Circle(_)));
    }

    #[test]
    fn test_equal_values_do_not_request_redraw() {
        let mut renderer = sized(CircleImageConfig::new().border_width(4));
        renderer.set_border_width(4);
        renderer.set_circle_background_color(Color::TRANSPARENT);
        renderer.set_border_colors(renderer.border_colors().to_vec());
        renderer.set_border_style(BorderStyle::Still);
        renderer.set_color_filter(None);
        assert!(!renderer.take_redraw_request());

        renderer.set_border_width(5);
        assert!(renderer.take_redraw_request());
    }

    #[test]
    fn test_border_style_drives_animation() {
        let mut renderer = sized(CircleImageConfig::new().border_width(4));
        assert!(!renderer.is_animating());

        renderer.set_border_style(BorderStyle::Rotate);
        assert!(renderer.is_animating());

        renderer.on_visibility_changed(false);
        assert!(!renderer.is_animating());

        renderer.on_visibility_changed(true);
        assert!(renderer.is_animating());

        renderer.set_border_style(BorderStyle::Still);
        assert!(!renderer.is_animating());
    }

    #[test]
    fn test_hidden_widget_does_not_start() {
        let mut renderer = sized(CircleImageConfig::new().border_width(4));
        renderer.on_visibility_changed(false);
        renderer.set_border_style(BorderStyle::Rotate);
        assert!(!renderer.is_animating());
        assert!(!renderer.advance(Duration::from_millis(16)));
    }

    #[test]
    fn test_advance_requests_redraw() {
        let mut renderer = sized(
            CircleImageConfig::new()
                .border_width(4)
                .border_style(BorderStyle::Rotate),
        );
        assert!(renderer.advance(Duration::from_millis(300)));
        assert!(renderer.take_redraw_request());
        assert!((renderer.animation_state().rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_solid_easing_applies_from_next_start() {
        let mut renderer = sized(
            CircleImageConfig::new()
                .border_width(4)
                .border_style(BorderStyle::Rotate),
        );
        renderer.set_solid_track_easing(TimingFunction::Linear);
        renderer.advance(Duration::from_millis(500));
        assert!(renderer.animation_state().solid_sweep < 54.0 - 1.0);

        renderer.set_border_style(BorderStyle::Still);
        renderer.set_border_style(BorderStyle::Rotate);
        renderer.advance(Duration::from_millis(500));
        assert!((renderer.animation_state().solid_sweep - 54.0).abs() < 1e-3);
        assert_eq!(renderer.solid_track_easing(), TimingFunction::Linear);
    }

    #[test]
    fn test_track_color_change_rebuilds_paints_before_draw() {
        let mut renderer = sized(
            CircleImageConfig::new()
                .border_width(4)
                .border_style(BorderStyle::Rotate),
        );
        renderer.set_border_track_end_color(Color::BLACK);
        assert!(renderer.is_animating());
        assert!(renderer.take_redraw_request());

        let mut ctx = PaintContext::new();
        renderer.paint(&mut ctx);
        let Some(DrawCommand::Arc { stroke, .. }) = ctx.arcs().next() else {
            panic!("expected a track arc");
        };
        assert!(matches!(
            stroke.brush,
            crate::renderer::Brush::LinearGradient { end_color, .. } if end_color == Color::BLACK
        ));
    }

    #[test]
    fn test_color_filter_applies_to_circle_only() {
        let mut renderer = sized(CircleImageConfig::new());
        renderer.set_bitmap(Bitmap::solid(4, 4, Color::WHITE).unwrap());
        renderer.set_color_filter(Some(ColorFilter::Tint(Color::from_hex(0xFF0000))));

        let ImagePaint::Circle(paint) = renderer.image_paint() else {
            panic!("expected a circular image");
        };
        assert_eq!(paint.bitmap.pixel(0, 0), Some(Color::from_hex(0xFF0000)));

        renderer.set_disable_circular_transformation(true);
        let ImagePaint::Rectangular(paint) = renderer.image_paint() else {
            panic!("expected a rectangular image");
        };
        assert_eq!(paint.bitmap.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_disabled_transformation_draws_plain_image() {
        let mut renderer = sized(CircleImageConfig::new().border_width(6));
        renderer.set_bitmap(Bitmap::solid(4, 2, Color::WHITE).unwrap());
        renderer.set_disable_circular_transformation(true);

        let mut ctx = PaintContext::new();
        renderer.paint(&mut ctx);
        assert_eq!(ctx.commands().len(), 1);
        assert!(matches!(ctx.commands()[0], DrawCommand::Bitmap { .. }));

        renderer.set_disable_circular_transformation(false);
        ctx.clear();
        renderer.paint(&mut ctx);
        assert!(matches!(
            ctx.commands()[0],
            DrawCommand::Circle {
                fill: Fill::Bitmap(_),
                ..
            }
        ));
        assert_eq!(ctx.arcs().count(), 1);
    }

    #[test]
    fn test_new_bitmap_updates_transform() {
        let mut renderer = sized(CircleImageConfig::new());
        renderer.set_bitmap(Bitmap::solid(100, 50, Color::WHITE).unwrap());
        let ImagePaint::Circle(paint) = renderer.image_paint() else {
            panic!("expected a circular image");
        };
        // 100x50 scaled by 4 to 400x200, centered horizontally in 200x200
        let (x, y) = paint.transform.transform_point(0.0, 0.0);
        assert_eq!((x, y), (-100.0, 0.0));
        let (x, y) = paint.transform.transform_point(100.0, 50.0);
        assert_eq!((x, y), (300.0, 200.0));
    }

    #[test]
    fn test_content_fit_guards() {
        let mut renderer = CircleImageRenderer::new();
        assert_eq!(renderer.content_fit(), ContentFit::Cover);
        assert!(renderer.set_content_fit(ContentFit::Cover).is_ok());
        assert!(matches!(
            renderer.set_content_fit(ContentFit::Fill),
            Err(Error::UnsupportedContentFit(ContentFit::Fill))
        ));
        assert!(renderer.set_adjust_view_bounds(false).is_ok());
        assert!(matches!(
            renderer.set_adjust_view_bounds(true),
            Err(Error::AdjustViewBoundsUnsupported)
        ));
    }

    #[test]
    fn test_with_config_normalizes_colors() {
        let mut config = CircleImageConfig::new();
        config.border_colors = vec![Color::BLACK; 64];
        let renderer = CircleImageRenderer::with_config(config);
        assert_eq!(renderer.border_colors().len(), 50);

        let mut config = CircleImageConfig::new();
        config.border_colors.clear();
        let renderer = CircleImageRenderer::with_config(config);
        assert_eq!(renderer.border_colors().len(), 1);
    }
}
