//! Color filters applied to the circular image.

use crate::bitmap::Bitmap;
use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorFilter {
    /// Paint every pixel with the tint color, keeping the pixel's coverage
    Tint(Color),
    /// 4x5 row-major matrix over `0..=255` channels; the last column of each
    /// row is an additive offset
    Matrix([f32; 20]),
}

impl ColorFilter {
    /// Desaturate using luminance weights.
    pub fn grayscale() -> Self {
        const R: f32 = 0.213;
        const G: f32 = 0.715;
        const B: f32 = 0.072;
        ColorFilter::Matrix([
            R, G, B, 0.0, 0.0, //
            R, G, B, 0.0, 0.0, //
            R, G, B, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// A filtered copy of `bitmap`.
    pub fn apply(&self, bitmap: &Bitmap) -> Bitmap {
        let mut image = bitmap.as_rgba_image().clone();
        for pixel in image.pixels_mut() {
            pixel.0 = self.filter_pixel(pixel.0);
        }
        Bitmap::from_rgba_image(image).unwrap_or_else(|| bitmap.clone())
    }

    fn filter_pixel(&self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        match self {
            ColorFilter::Tint(tint) => {
                let [tr, tg, tb, ta] = tint.to_rgba8();
                let alpha = (u16::from(ta) * u16::from(a) + 127) / 255;
                [tr, tg, tb, alpha as u8]
            }
            ColorFilter::Matrix(m) => {
                let src = [r, g, b, a].map(f32::from);
                let row = |i: usize| {
                    let base = i * 5;
                    let value = m[base] * src[0]
                        + m[base + 1] * src[1]
                        + m[base + 2] * src[2]
                        + m[base + 3] * src[3]
                        + m[base + 4];
                    value.round().clamp(0.0, 255.0) as u8
                };
                [row(0), row(1), row(2), row(3)]
            }
        }
    }
}
