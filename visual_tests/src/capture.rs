use crate::Result;
use circle_image::prelude::*;
use image::RgbaImage;
use std::path::Path;
use std::time::Duration;

/// Step used to feed animation time, matching a 60 Hz host
const FRAME_STEP: Duration = Duration::from_millis(16);

/// An offscreen circle image setup to capture
#[derive(Clone)]
pub struct Scene {
    /// Name used for the reference and output files
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub padding: Padding,
    pub config: CircleImageConfig,
    pub image: Option<ImageSource>,
    pub circular: bool,
    /// Animation time fed to the renderer before capturing
    pub elapsed: Duration,
    /// Surface color behind the widget
    pub background: Color,
}

impl Scene {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            padding: Padding::default(),
            config: CircleImageConfig::default(),
            image: None,
            circular: true,
            elapsed: Duration::ZERO,
            background: Color::WHITE,
        }
    }

    pub fn config(mut self, config: CircleImageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn image(mut self, image: impl Into<ImageSource>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }

    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn disable_circular_transformation(mut self) -> Self {
        self.circular = false;
        self
    }
}

/// Render a scene the way a host would and return the pixels
pub fn capture_scene(scene: &Scene) -> Result<RgbaImage> {
    let mut renderer = CircleImageRenderer::with_config(scene.config.clone());
    renderer.set_size(Size::new(scene.width as f32, scene.height as f32));
    renderer.set_padding(scene.padding);
    if let Some(source) = &scene.image {
        renderer.set_image(source.clone());
    }
    renderer.set_disable_circular_transformation(!scene.circular);

    let mut remaining = scene.elapsed;
    while !remaining.is_zero() {
        let step = remaining.min(FRAME_STEP);
        renderer.advance(step);
        remaining -= step;
    }

    let mut canvas = PixmapCanvas::new(scene.width, scene.height)?;
    canvas.clear(scene.background);
    renderer.paint(&mut canvas);
    Ok(canvas.to_rgba_image())
}

/// Capture a scene straight to a PNG file
pub fn capture_to(scene: &Scene, path: &Path) -> Result<()> {
    capture_scene(scene)?.save(path)?;
    Ok(())
}
