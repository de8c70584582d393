//! Drawing the circle image onto a [`Canvas`].
//!
//! [`render`] turns a [`Frame`] (geometry, configuration, prepared paints and
//! the current animation values) into canvas calls. Backends implement the
//! small [`Canvas`] trait: [`PixmapCanvas`] rasterizes with tiny-skia and
//! [`PaintContext`] records [`DrawCommand`]s.

mod commands;
mod filter;
mod pixmap;

pub use commands::{DrawCommand, PaintContext};
pub use filter::ColorFilter;
pub use pixmap::PixmapCanvas;

use crate::animation::AnimationState;
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::config::{
    BorderStyle, CircleImageConfig, ARC_START_ANGLE, DOTTED_TRACK_DASH, SOLID_ARC_MARGIN_ANGLE,
};
use crate::layout::{Geometry, Rect, Size};
use crate::transform::Transform;

/// Minimal drawing surface the renderer needs.
///
/// Angles are in degrees, clockwise from the positive x axis (screen
/// coordinates, y pointing down).
pub trait Canvas {
    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the last saved transform.
    fn restore(&mut self);

    /// Rotate subsequent drawing by `degrees` about `pivot`.
    fn rotate(&mut self, degrees: f32, pivot: (f32, f32));

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, fill: &Fill);

    /// Stroke the arc of the ellipse inscribed in `oval`.
    fn stroke_arc(&mut self, oval: Rect, start_angle: f32, sweep_angle: f32, stroke: &ArcStroke);

    /// Draw a bitmap through its transform, limited to `clip`.
    fn draw_bitmap(&mut self, paint: &BitmapPaint, clip: Rect);
}

/// A bitmap plus the mapping from bitmap pixels to canvas coordinates.
#[derive(Debug, Clone)]
pub struct BitmapPaint {
    pub bitmap: Bitmap,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub enum Fill {
    Solid(Color),
    Bitmap(BitmapPaint),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        start: (f32, f32),
        end: (f32, f32),
        start_color: Color,
        end_color: Color,
    },
}

/// Stroke with round caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStroke {
    pub width: f32,
    pub brush: Brush,
    /// On/off dash lengths
    pub dash: Option<[f32; 2]>,
}

/// The image paint prepared by setup.
#[derive(Debug, Clone, Default)]
pub enum ImagePaint {
    /// No bitmap available
    #[default]
    None,
    /// Center-cropped into the drawable circle
    Circle(BitmapPaint),
    /// Center-cropped into the padded bounds, circular transformation off
    Rectangular(BitmapPaint),
}

/// Stroke paints of the rotating border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPaints {
    /// Gradient arc
    pub solid: ArcStroke,
    /// Dotted arc
    pub dotted: ArcStroke,
}

impl TrackPaints {
    /// Both tracks share the gradient, running from the top-left corner of
    /// the widget to its bottom-right corner.
    pub fn new(config: &CircleImageConfig, size: Size) -> Self {
        let brush = Brush::LinearGradient {
            start: (0.0, 0.0),
            end: (size.width, size.height),
            start_color: config.border_track_start_color,
            end_color: config.border_track_end_color,
        };
        let width = config.border_width as f32;
        Self {
            solid: ArcStroke {
                width,
                brush,
                dash: None,
            },
            dotted: ArcStroke {
                width,
                brush,
                dash: Some(DOTTED_TRACK_DASH),
            },
        }
    }
}

/// One arc of the still border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderArc {
    pub start_angle: f32,
    pub sweep_angle: f32,
    pub color: Color,
}

/// Split the ring evenly among `colors`, leaving a small gap between
/// neighbours. A single color draws a closed ring.
pub fn still_border_arcs(colors: &[Color]) -> Vec<BorderArc> {
    if colors.len() == 1 {
        return vec![BorderArc {
            start_angle: ARC_START_ANGLE,
            sweep_angle: 360.0,
            color: colors[0],
        }];
    }

    let step = 360.0 / colors.len() as f32;
    colors
        .iter()
        .enumerate()
        .map(|(i, &color)| BorderArc {
            start_angle: ARC_START_ANGLE + i as f32 * step,
            sweep_angle: step - SOLID_ARC_MARGIN_ANGLE,
            color,
        })
        .collect()
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub geometry: &'a Geometry,
    /// `false` draws only the rectangular image
    pub circular: bool,
    pub config: &'a CircleImageConfig,
    pub image: &'a ImagePaint,
    pub tracks: Option<&'a TrackPaints>,
    pub state: AnimationState,
}

/// Draw one frame.
///
/// Order: circle background, image circle, border. With the circular
/// transformation disabled only the rectangular image is drawn.
pub fn render<C: Canvas + ?Sized>(canvas: &mut C, frame: &Frame<'_>) {
    let geometry = frame.geometry;
    let config = frame.config;

    if !frame.circular {
        if let ImagePaint::Rectangular(paint) = frame.image {
            canvas.draw_bitmap(paint, geometry.bounds);
        }
        return;
    }

    let image = match frame.image {
        ImagePaint::Circle(paint) => Some(paint),
        ImagePaint::Rectangular(_) | ImagePaint::None => None,
    };

    if let Some(image) = image {
        let center = geometry.drawable_center();
        let radius = geometry.drawable_radius;
        if !config.circle_background_color.is_transparent() {
            canvas.fill_circle(center, radius, &Fill::Solid(config.circle_background_color));
        }
        canvas.fill_circle(center, radius, &Fill::Bitmap(image.clone()));
    }

    if config.border_width == 0 {
        return;
    }

    match config.border_style {
        BorderStyle::Still => draw_still_border(canvas, geometry, config),
        BorderStyle::Rotate => draw_rotating_border(canvas, geometry, frame.tracks, frame.state),
    }
}

fn draw_still_border<C: Canvas + ?Sized>(
    canvas: &mut C,
    geometry: &Geometry,
    config: &CircleImageConfig,
) {
    let width = config.border_width as f32;
    for arc in still_border_arcs(&config.border_colors) {
        let stroke = ArcStroke {
            width,
            brush: Brush::Solid(arc.color),
            dash: None,
        };
        canvas.stroke_arc(geometry.border, arc.start_angle, arc.sweep_angle, &stroke);
    }
}

fn draw_rotating_border<C: Canvas + ?Sized>(
    canvas: &mut C,
    geometry: &Geometry,
    tracks: Option<&TrackPaints>,
    state: AnimationState,
) {
    let Some(tracks) = tracks else {
        log::trace!("rotating border skipped, track paints not prepared");
        return;
    };

    canvas.save();
    canvas.rotate(state.rotation, geometry.border.center());
    canvas.stroke_arc(
        geometry.border,
        ARC_START_ANGLE,
        state.solid_sweep,
        &tracks.solid,
    );
    canvas.stroke_arc(
        geometry.border,
        ARC_START_ANGLE,
        state.dotted_sweep,
        &tracks.dotted,
    );
    canvas.restore();
}
