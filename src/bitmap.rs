//! Raster bitmaps and the image sources they are decoded from.
//!
//! Supports PNG, JPEG, GIF, WebP raster formats, SVG vector graphics
//! (rasterized at their intrinsic size) and solid colors.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use resvg::tiny_skia::{ColorU8, Pixmap, PixmapRef};

use crate::color::Color;

/// Edge length of the bitmap a solid color source is rasterized to.
const COLOR_SOURCE_DIMENSION: u32 = 2;

/// An immutable straight-alpha RGBA bitmap. Cloning shares the pixels.
#[derive(Clone)]
pub struct Bitmap {
    image: Arc<RgbaImage>,
}

impl Bitmap {
    /// Wrap decoded pixels. `None` for an empty image.
    pub fn from_rgba_image(image: RgbaImage) -> Option<Self> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        Some(Self {
            image: Arc::new(image),
        })
    }

    /// A `width` x `height` bitmap filled with `color`.
    pub fn solid(width: u32, height: u32, color: Color) -> Option<Self> {
        let pixel = image::Rgba(color.to_rgba8());
        Self::from_rgba_image(RgbaImage::from_pixel(width, height, pixel))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Color::from_rgba8(r, g, b, a))
    }

    /// Whether both handles share the same pixel buffer.
    pub fn ptr_eq(&self, other: &Bitmap) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }

    /// Premultiplied copy for the raster backend.
    pub(crate) fn to_pixmap(&self) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(self.width(), self.height())?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Some(pixmap)
    }

    /// Straight-alpha copy of premultiplied raster pixels.
    pub(crate) fn from_pixmap(pixmap: PixmapRef<'_>) -> Option<Self> {
        Self::from_rgba_image(demultiply_pixmap(pixmap))
    }

    /// Decode or rasterize a source. Failures are logged and yield `None`.
    pub fn from_source(source: &ImageSource) -> Option<Self> {
        let bitmap = match source {
            ImageSource::Bitmap(bitmap) => Some(bitmap.clone()),
            ImageSource::Color(color) => {
                Self::solid(COLOR_SOURCE_DIMENSION, COLOR_SOURCE_DIMENSION, *color)
            }
            ImageSource::Path(path) => decode_file(path),
            ImageSource::Bytes(bytes) => decode_bytes(bytes),
            ImageSource::SvgPath(path) => std::fs::read(path)
                .map_err(|e| log::warn!("failed to read {}: {}", path.display(), e))
                .ok()
                .and_then(|data| rasterize_svg(&data)),
            ImageSource::SvgBytes(bytes) => rasterize_svg(bytes),
        };

        if bitmap.is_none() {
            log::warn!("image source {:?} produced no bitmap", source);
        }
        bitmap
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

pub(crate) fn demultiply_pixmap(pixmap: PixmapRef<'_>) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = image::Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}

fn decode_file(path: &Path) -> Option<Bitmap> {
    match image::open(path) {
        Ok(decoded) => Bitmap::from_rgba_image(decoded.to_rgba8()),
        Err(e) => {
            log::warn!("failed to decode {}: {}", path.display(), e);
            None
        }
    }
}

fn decode_bytes(bytes: &[u8]) -> Option<Bitmap> {
    match image::load_from_memory(bytes) {
        Ok(decoded) => Bitmap::from_rgba_image(decoded.to_rgba8()),
        Err(e) => {
            log::warn!("failed to decode image bytes: {}", e);
            None
        }
    }
}

/// Rasterize an SVG document at its intrinsic size.
fn rasterize_svg(bytes: &[u8]) -> Option<Bitmap> {
    let tree = match resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default()) {
        Ok(tree) => tree,
        Err(e) => {
            log::warn!("failed to parse svg: {}", e);
            return None;
        }
    };
    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    // Pixmap::new refuses zero-sized surfaces
    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Bitmap::from_pixmap(pixmap.as_ref())
}

/// Where the displayed image comes from.
#[derive(Clone)]
pub enum ImageSource {
    /// Already decoded pixels
    Bitmap(Bitmap),
    /// A solid color, rasterized to a tiny bitmap
    Color(Color),
    /// Raster image from a file path (PNG, JPEG, GIF, WebP)
    Path(PathBuf),
    /// Raster image from in-memory bytes
    Bytes(Arc<[u8]>),
    /// SVG from a file path
    SvgPath(PathBuf),
    /// SVG from in-memory bytes
    SvgBytes(Arc<[u8]>),
}

/// In-memory sources print their length, not their contents.
impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Bitmap(bitmap) => f.debug_tuple("Bitmap").field(bitmap).finish(),
            ImageSource::Color(color) => f.debug_tuple("Color").field(color).finish(),
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ImageSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            ImageSource::SvgPath(path) => f.debug_tuple("SvgPath").field(path).finish(),
            ImageSource::SvgBytes(bytes) => write!(f, "SvgBytes({} bytes)", bytes.len()),
        }
    }
}

impl From<Bitmap> for ImageSource {
    fn from(bitmap: Bitmap) -> Self {
        ImageSource::Bitmap(bitmap)
    }
}

impl From<Color> for ImageSource {
    fn from(color: Color) -> Self {
        ImageSource::Color(color)
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::from(PathBuf::from(path))
    }
}

impl From<String> for ImageSource {
    fn from(path: String) -> Self {
        ImageSource::from(PathBuf::from(path))
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            ImageSource::SvgPath(path)
        } else {
            ImageSource::Path(path)
        }
    }
}

/// How image content fits its bounds. Circle images only support
/// [`ContentFit::Cover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFit {
    /// Scale to fit within bounds while preserving aspect ratio.
    Contain,
    /// Scale to cover bounds while preserving aspect ratio, cropping the
    /// overflow.
    #[default]
    Cover,
    /// Stretch to exactly fill bounds, ignoring aspect ratio.
    Fill,
    /// Use the image's intrinsic size, ignoring widget bounds.
    None,
}
