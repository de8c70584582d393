//! Host integration.
//!
//! A platform owns the window, the event loop and the frame clock. It wraps a
//! [`CircleImageRenderer`] in a [`CircleImageView`], forwards its lifecycle
//! callbacks and receives redraw requests through [`Host`].

use std::time::{Duration, Instant};

use crate::circle_image::CircleImageRenderer;
use crate::config::CircleImageConfig;
use crate::layout::{Padding, Size};
use crate::renderer::Canvas;

/// Callbacks the view needs from its host.
pub trait Host {
    /// Schedule a frame. Repeated requests before the frame is drawn may be
    /// coalesced.
    fn request_redraw(&self);
}

impl<H: Host + ?Sized> Host for &H {
    fn request_redraw(&self) {
        (**self).request_redraw();
    }
}

impl<H: Host + ?Sized> Host for std::rc::Rc<H> {
    fn request_redraw(&self) {
        (**self).request_redraw();
    }
}

pub struct CircleImageView<H: Host> {
    host: H,
    renderer: CircleImageRenderer,
    last_frame: Option<Instant>,
}

impl<H: Host> CircleImageView<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, CircleImageConfig::default())
    }

    pub fn with_config(host: H, config: CircleImageConfig) -> Self {
        let mut view = Self {
            host,
            renderer: CircleImageRenderer::with_config(config),
            last_frame: None,
        };
        view.flush_redraw();
        view
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn renderer(&self) -> &CircleImageRenderer {
        &self.renderer
    }

    /// Mutable access for setters. Call [`update`](Self::update) instead to
    /// have redraw requests forwarded automatically.
    pub fn renderer_mut(&mut self) -> &mut CircleImageRenderer {
        &mut self.renderer
    }

    /// Run `f` against the renderer and forward any redraw it requested.
    /// An animation started by `f` begins counting from the next frame.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut CircleImageRenderer) -> R) -> R {
        let was_animating = self.renderer.is_animating();
        let result = f(&mut self.renderer);
        if !was_animating && self.renderer.is_animating() {
            self.last_frame = None;
        }
        self.flush_redraw();
        result
    }

    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        self.update(|renderer| renderer.set_size(Size::new(width as f32, height as f32)));
    }

    pub fn set_padding(&mut self, padding: impl Into<Padding>) {
        let padding = padding.into();
        self.update(|renderer| renderer.set_padding(padding));
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        self.update(|renderer| renderer.on_visibility_changed(visible));
    }

    /// Advance the animation to `now`. The first frame after creation or
    /// after the animation (re)started only records the time.
    pub fn on_frame(&mut self, now: Instant) {
        let delta = match self.last_frame.replace(now) {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        if !delta.is_zero() {
            self.update(|renderer| renderer.advance(delta));
        }
    }

    /// Whether the view wants frames to keep coming.
    pub fn is_animating(&self) -> bool {
        self.renderer.is_animating()
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.renderer.paint(canvas);
    }

    fn flush_redraw(&mut self) {
        if self.renderer.take_redraw_request() {
            self.host.request_redraw();
        }
    }
}
