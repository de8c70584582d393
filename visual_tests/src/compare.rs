use crate::{Result, VisualTestError};
use image::{Rgba, RgbaImage};
use image_compare::Algorithm;

/// Result of comparing two images
pub struct CompareResult {
    /// Similarity score from 0.0 to 1.0
    pub similarity: f64,
}

/// Compare two images using SSIM algorithm
pub fn compare_images(reference: &RgbaImage, captured: &RgbaImage) -> Result<CompareResult> {
    // Check dimensions match
    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "Image dimensions don't match: reference {:?} vs captured {:?}",
            reference.dimensions(),
            captured.dimensions()
        )));
    }

    // SSIM works on grayscale or RGB
    let ref_rgb = image::DynamicImage::ImageRgba8(reference.clone()).to_rgb8();
    let cap_rgb = image::DynamicImage::ImageRgba8(captured.clone()).to_rgb8();

    let result =
        image_compare::rgb_similarity_structure(&Algorithm::MSSIMSimple, &ref_rgb, &cap_rgb)
            .map_err(|e| VisualTestError::Compare(format!("SSIM comparison failed: {}", e)))?;

    Ok(CompareResult {
        similarity: result.score,
    })
}

/// Generate a diff image highlighting differences between two images
pub fn generate_diff_image(reference: &RgbaImage, captured: &RgbaImage) -> RgbaImage {
    let (width, height) = reference.dimensions();
    let mut diff_img = RgbaImage::new(width, height);

    for (x, y, out) in diff_img.enumerate_pixels_mut() {
        let ref_pixel = reference.get_pixel(x, y);
        let Some(cap_pixel) = captured.get_pixel_checked(x, y) else {
            *out = Rgba([255, 0, 255, 255]);
            continue;
        };

        let diff = pixel_difference(ref_pixel, cap_pixel);
        *out = if diff > 10 {
            // Highlight differences in red
            let intensity = (diff as f32 / 255.0 * 200.0 + 55.0) as u8;
            Rgba([intensity, 0, 0, 255])
        } else {
            // Show original with reduced opacity
            let r = (cap_pixel[0] as u16 / 3) as u8;
            let g = (cap_pixel[1] as u16 / 3) as u8;
            let b = (cap_pixel[2] as u16 / 3) as u8;
            Rgba([r, g, b, 255])
        };
    }

    diff_img
}

/// Calculate the maximum channel difference between two pixels
fn pixel_difference(a: &Rgba<u8>, b: &Rgba<u8>) -> u8 {
    let dr = (a[0] as i16 - b[0] as i16).unsigned_abs() as u8;
    let dg = (a[1] as i16 - b[1] as i16).unsigned_abs() as u8;
    let db = (a[2] as i16 - b[2] as i16).unsigned_abs() as u8;
    let da = (a[3] as i16 - b[3] as i16).unsigned_abs() as u8;
    dr.max(dg).max(db).max(da)
}
