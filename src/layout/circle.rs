//! Circle layout: square content bounds, border stroke bounds, the drawable
//! circle and the center-crop mapping of a bitmap into it.
//!
//! ## Coordinate model
//!
//! ```text
//! +------------------------------- widget -------------------------------+
//! |  padding                                                             |
//! |     +---------------- bounds (padded area) ----------------+         |
//! |     |          +-------- content (square) --------+        |         |
//! |     |          |  +----- border (stroke path) --+ |        |         |
//! |     |          |  |  +-- drawable (image) ---+  | |        |         |
//! ```
//!
//! The border rect is the content rect inset by half the border width so a
//! stroke of that width exactly fills the content edge. The drawable rect is
//! the content rect inset by the border padding, and by `border_width - 1`
//! more when the border sits outside the image instead of overlaying it.

use super::{Padding, Rect, Size};
use crate::transform::Transform;

/// Border parameters that influence layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderMetrics {
    /// Stroke width in pixels
    pub width: f32,
    /// Whether the border is drawn on top of the image
    pub overlay: bool,
    /// Extra gap between the content edge and the image
    pub padding: f32,
}

/// Draw-time geometry derived from the widget size, padding and border.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Area left after removing the widget padding
    pub bounds: Rect,
    /// Largest square centered in `bounds`
    pub content: Rect,
    /// Rect the border stroke is centered on
    pub border: Rect,
    /// Rect the circular image is fitted into
    pub drawable: Rect,
    /// Radius of the image circle
    pub drawable_radius: f32,
}

impl Geometry {
    /// Center of the image circle.
    pub fn drawable_center(&self) -> (f32, f32) {
        self.drawable.center()
    }
}

/// Compute the circle geometry for a widget of `size` with `padding`.
pub fn compute_geometry(size: Size, padding: Padding, border: BorderMetrics) -> Geometry {
    let bounds = padded_bounds(size, padding);
    let content = square_in(bounds);

    let border_rect = content.inset(border.width / 2.0);

    let mut drawable = content;
    if border.padding > 0.0 {
        drawable = drawable.inset(border.padding);
    }
    if !border.overlay && border.width > 0.0 {
        drawable = drawable.inset(border.width - 1.0);
    }
    let drawable_radius = (drawable.height / 2.0).min(drawable.width / 2.0);

    Geometry {
        bounds,
        content,
        border: border_rect,
        drawable,
        drawable_radius,
    }
}

fn padded_bounds(size: Size, padding: Padding) -> Rect {
    let available_width = (size.width - padding.horizontal()).max(0.0);
    let available_height = (size.height - padding.vertical()).max(0.0);
    Rect::new(padding.left, padding.top, available_width, available_height)
}

/// Largest square centered within `area`; leftover space is split evenly.
fn square_in(area: Rect) -> Rect {
    let side = area.width.min(area.height);
    let left = area.x + (area.width - side) / 2.0;
    let top = area.y + (area.height - side) / 2.0;
    Rect::new(left, top, side, side)
}

/// Uniform scale plus pixel-snapped translation mapping bitmap space into
/// widget space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapTransform {
    pub scale: f32,
    pub translate: (f32, f32),
}

impl BitmapTransform {
    /// Scale first, then translate.
    pub fn to_transform(&self) -> Transform {
        Transform::translate(self.translate.0, self.translate.1).then(&Transform::scale(self.scale))
    }

    /// Where a bitmap of the given size lands after the transform.
    pub fn map_bitmap(&self, width: u32, height: u32) -> Rect {
        Rect::new(
            self.translate.0,
            self.translate.1,
            width as f32 * self.scale,
            height as f32 * self.scale,
        )
    }
}

/// Center-crop a `bitmap_width` x `bitmap_height` bitmap into `target`.
///
/// The bitmap is scaled uniformly so it covers `target` completely; the
/// overflow on the longer axis is split evenly and the offset is rounded to
/// whole pixels.
pub fn center_crop(bitmap_width: u32, bitmap_height: u32, target: Rect) -> BitmapTransform {
    if bitmap_width == 0 || bitmap_height == 0 {
        return BitmapTransform {
            scale: 1.0,
            translate: (target.x, target.y),
        };
    }

    let bw = bitmap_width as f32;
    let bh = bitmap_height as f32;
    let mut dx = 0.0;
    let mut dy = 0.0;

    let scale = if bw * target.height > target.width * bh {
        let scale = target.height / bh;
        dx = (target.width - bw * scale) * 0.5;
        scale
    } else {
        let scale = target.width / bw;
        dy = (target.height - bh * scale) * 0.5;
        scale
    };

    BitmapTransform {
        scale,
        translate: (dx.round() + target.x, dy.round() + target.y),
    }
}
