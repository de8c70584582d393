//! Timing functions (easing curves) for animation tracks.
//!
//! ```
//! use circle_image::animation::TimingFunction;
//!
//! let eased = TimingFunction::AccelerateDecelerate.evaluate(0.25);
//! assert!(eased < 0.25);
//! ```

use std::f32::consts::PI;

/// Timing function that controls the animation curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// `cos((t + 1) * PI) / 2 + 0.5`, the default curve for value animations
    #[default]
    AccelerateDecelerate,
}

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0)
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}
