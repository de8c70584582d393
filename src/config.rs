//! Widget configuration and its documented defaults.

use std::time::Duration;

use crate::animation::{BorderTimings, TimingFunction};
use crate::color::Color;
use crate::layout::BorderMetrics;

pub const DEFAULT_BORDER_WIDTH: u32 = 0;
pub const DEFAULT_BORDER_OVERLAY: bool = false;
pub const DEFAULT_CIRCLE_BACKGROUND_COLOR: Color = Color::TRANSPARENT;
pub const DEFAULT_BORDER_PADDING: u32 = 0;
pub const DEFAULT_BORDER_TRACK_START_COLOR: Color = Color::from_hex(0x4799FE);
pub const DEFAULT_BORDER_TRACK_END_COLOR: Color = Color::from_hex(0x19D7FD);
pub const DEFAULT_BORDER_COLOR: Color = DEFAULT_BORDER_TRACK_START_COLOR;
pub const DEFAULT_BORDER_ROTATE_DURATION_MS: u32 = 1200;
pub const DEFAULT_BORDER_TRACK_DURATION_MS: u32 = 2000;

/// Longest accepted border color sequence; extra entries are dropped.
pub const MAX_BORDER_COLORS: usize = 50;

/// Gap left between neighbouring segments of a multi-color still border.
pub const SOLID_ARC_MARGIN_ANGLE: f32 = 6.0;

/// Angle every border arc starts from (12 o'clock).
pub const ARC_START_ANGLE: f32 = 270.0;

/// On/off lengths of the dotted track.
pub const DOTTED_TRACK_DASH: [f32; 2] = [1.0, 15.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Static ring split evenly among the border colors
    #[default]
    Still,
    /// Spinning gradient arc with a breathing dashed track
    Rotate,
}

/// Everything the host can configure on a circle image.
#[derive(Debug, Clone)]
pub struct CircleImageConfig {
    /// Border stroke width in pixels
    pub border_width: u32,
    /// Draw the border on top of the image instead of around it
    pub border_overlay: bool,
    /// Fill drawn behind the image inside the circle
    pub circle_background_color: Color,
    /// Gap between the border and the image in pixels
    pub border_padding: u32,
    pub border_style: BorderStyle,
    /// Colors of the still border segments, 1 to [`MAX_BORDER_COLORS`]
    pub border_colors: Vec<Color>,
    pub border_track_start_color: Color,
    pub border_track_end_color: Color,
    /// One full spin of the rotating border
    pub border_rotate_duration_ms: u32,
    /// One growth or breathing stroke of the rotating border arcs
    pub border_track_duration_ms: u32,
    /// Easing of the solid arc
    pub solid_track_easing: TimingFunction,
}

impl Default for CircleImageConfig {
    fn default() -> Self {
        Self {
            border_width: DEFAULT_BORDER_WIDTH,
            border_overlay: DEFAULT_BORDER_OVERLAY,
            circle_background_color: DEFAULT_CIRCLE_BACKGROUND_COLOR,
            border_padding: DEFAULT_BORDER_PADDING,
            border_style: BorderStyle::default(),
            border_colors: vec![DEFAULT_BORDER_COLOR],
            border_track_start_color: DEFAULT_BORDER_TRACK_START_COLOR,
            border_track_end_color: DEFAULT_BORDER_TRACK_END_COLOR,
            border_rotate_duration_ms: DEFAULT_BORDER_ROTATE_DURATION_MS,
            border_track_duration_ms: DEFAULT_BORDER_TRACK_DURATION_MS,
            solid_track_easing: TimingFunction::AccelerateDecelerate,
        }
    }
}

impl CircleImageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn border_width(mut self, width: u32) -> Self {
        self.border_width = width;
        self
    }

    pub fn border_overlay(mut self, overlay: bool) -> Self {
        self.border_overlay = overlay;
        self
    }

    pub fn circle_background_color(mut self, color: Color) -> Self {
        self.circle_background_color = color;
        self
    }

    pub fn border_padding(mut self, padding: u32) -> Self {
        self.border_padding = padding;
        self
    }

    pub fn border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = style;
        self
    }

    /// Set the still border colors. Empty input keeps the current colors.
    pub fn border_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        if let Some(colors) = normalize_border_colors(colors.into()) {
            self.border_colors = colors;
        }
        self
    }

    pub fn border_track_start_color(mut self, color: Color) -> Self {
        self.border_track_start_color = color;
        self
    }

    pub fn border_track_end_color(mut self, color: Color) -> Self {
        self.border_track_end_color = color;
        self
    }

    pub fn border_rotate_duration_ms(mut self, duration_ms: u32) -> Self {
        self.border_rotate_duration_ms = duration_ms;
        self
    }

    pub fn border_track_duration_ms(mut self, duration_ms: u32) -> Self {
        self.border_track_duration_ms = duration_ms;
        self
    }

    pub fn solid_track_easing(mut self, easing: TimingFunction) -> Self {
        self.solid_track_easing = easing;
        self
    }

    pub fn border_metrics(&self) -> BorderMetrics {
        BorderMetrics {
            width: self.border_width as f32,
            overlay: self.border_overlay,
            padding: self.border_padding as f32,
        }
    }

    pub fn border_timings(&self) -> BorderTimings {
        BorderTimings {
            rotate_duration: Duration::from_millis(u64::from(self.border_rotate_duration_ms)),
            track_duration: Duration::from_millis(u64::from(self.border_track_duration_ms)),
            solid_easing: self.solid_track_easing,
        }
    }
}

/// Truncate to [`MAX_BORDER_COLORS`]. `None` for an empty sequence.
pub(crate) fn normalize_border_colors(mut colors: Vec<Color>) -> Option<Vec<Color>> {
    if colors.is_empty() {
        return None;
    }
    colors.truncate(MAX_BORDER_COLORS);
    Some(colors)
}
