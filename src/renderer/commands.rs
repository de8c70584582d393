//! Recorded draw operations.

use super::{ArcStroke, BitmapPaint, Canvas, Fill};
use crate::layout::Rect;
use crate::transform::Transform;

/// A single draw operation with the canvas transform at the time it was
/// issued.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Circle {
        center: (f32, f32),
        radius: f32,
        fill: Fill,
        transform: Transform,
    },
    Arc {
        /// Bounds of the ellipse the arc lies on
        oval: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke: ArcStroke,
        transform: Transform,
    },
    Bitmap {
        paint: BitmapPaint,
        clip: Rect,
        transform: Transform,
    },
}

/// A [`Canvas`] that records commands instead of drawing.
#[derive(Debug, Default)]
pub struct PaintContext {
    commands: Vec<DrawCommand>,
    /// Saved transforms, innermost last
    transform_stack: Vec<Transform>,
    transform: Transform,
}

impl PaintContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all buffers for reuse, preserving allocated capacity
    pub fn clear(&mut self) {
        self.commands.clear();
        self.transform_stack.clear();
        self.transform = Transform::IDENTITY;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Only the arc commands, in draw order.
    pub fn arcs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Arc { .. }))
    }

    pub fn current_transform(&self) -> Transform {
        self.transform
    }
}

impl Canvas for PaintContext {
    fn save(&mut self) {
        self.transform_stack.push(self.transform);
    }

    fn restore(&mut self) {
        match self.transform_stack.pop() {
            Some(transform) => self.transform = transform,
            None => log::warn!("restore without matching save"),
        }
    }

    fn rotate(&mut self, degrees: f32, pivot: (f32, f32)) {
        self.transform = self
            .transform
            .then(&Transform::rotate_about(degrees, pivot.0, pivot.1));
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, fill: &Fill) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill: fill.clone(),
            transform: self.transform,
        });
    }

    fn stroke_arc(&mut self, oval: Rect, start_angle: f32, sweep_angle: f32, stroke: &ArcStroke) {
        self.commands.push(DrawCommand::Arc {
            oval,
            start_angle,
            sweep_angle,
            stroke: *stroke,
            transform: self.transform,
        });
    }

    fn draw_bitmap(&mut self, paint: &BitmapPaint, clip: Rect) {
        self.commands.push(DrawCommand::Bitmap {
            paint: paint.clone(),
            clip,
            transform: self.transform,
        });
    }
}
