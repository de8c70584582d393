//! A circular image view with an optional still or rotating border.
//!
//! The crate is split the way a widget is: [`layout`] computes the circle
//! geometry, [`animation`] drives the rotating border, [`renderer`] draws a
//! frame onto a [`Canvas`](renderer::Canvas), and [`CircleImageRenderer`]
//! ties them together. [`platform`] adapts it to a host event loop.

pub mod animation;
pub mod bitmap;
pub mod circle_image;
pub mod color;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod layout;
pub mod platform;
pub mod renderer;
pub mod transform;

pub use circle_image::CircleImageRenderer;
pub use error::{Error, Result};

pub mod prelude {
    pub use crate::animation::{AnimationState, BorderAnimation, TimingFunction};
    pub use crate::bitmap::{Bitmap, ContentFit, ImageSource};
    pub use crate::color::Color;
    pub use crate::config::{BorderStyle, CircleImageConfig};
    pub use crate::layout::{Padding, Rect, Size};
    pub use crate::platform::{CircleImageView, Host};
    pub use crate::renderer::{Canvas, ColorFilter, PaintContext, PixmapCanvas};
    pub use crate::{CircleImageRenderer, Error, Result};
}
