mod capture;
mod compare;

pub use capture::{capture_scene, capture_to, Scene};
pub use compare::{compare_images, generate_diff_image, CompareResult};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("Failed to render scene: {0}")]
    Render(#[from] circle_image::Error),
    #[error("Failed to compare images: {0}")]
    Compare(String),
    #[error("Reference image not found: {0} (run with UPDATE_REFERENCES=1 to record it)")]
    ReferenceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

/// Result of a visual test
pub struct VisualTestResult {
    /// Whether the test passed (similarity >= threshold)
    pub passed: bool,
    /// The similarity score (0.0 to 1.0)
    pub similarity: f64,
    /// Path to the captured image
    pub captured_path: PathBuf,
    /// Path to the reference image
    pub reference_path: PathBuf,
    /// Path to diff image (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

/// Get the path to the references directory
pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

/// Get the path to a reference image for a scene
pub fn reference_path(scene_name: &str) -> PathBuf {
    references_dir().join(format!("{}.png", scene_name))
}

/// Get the path to the output directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

/// Get the path to a captured image
pub fn captured_path(scene_name: &str) -> PathBuf {
    output_dir().join(format!("{}_captured.png", scene_name))
}

/// Get the path to a diff image
pub fn diff_path(scene_name: &str) -> PathBuf {
    output_dir().join(format!("{}_diff.png", scene_name))
}

/// Run a visual regression test against the stored reference.
pub fn run_visual_test(scene: &Scene, similarity_threshold: f64) -> Result<VisualTestResult> {
    std::fs::create_dir_all(output_dir())?;

    let ref_path = reference_path(&scene.name);
    let cap_path = captured_path(&scene.name);

    if !ref_path.exists() {
        return Err(VisualTestError::ReferenceNotFound(ref_path));
    }

    let captured = capture_scene(scene)?;
    captured.save(&cap_path)?;

    let reference = image::open(&ref_path)?.to_rgba8();
    let compare_result = compare_images(&reference, &captured)?;
    let passed = compare_result.similarity >= similarity_threshold;

    // Generate diff if failed
    let diff = if !passed {
        let diff_file = diff_path(&scene.name);
        generate_diff_image(&reference, &captured).save(&diff_file)?;
        Some(diff_file)
    } else {
        None
    };

    Ok(VisualTestResult {
        passed,
        similarity: compare_result.similarity,
        captured_path: cap_path,
        reference_path: ref_path,
        diff_path: diff,
    })
}

/// Overwrite the reference image for a scene
pub fn update_reference(scene: &Scene) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;

    let ref_path = reference_path(&scene.name);
    capture_to(scene, &ref_path)?;

    println!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}
