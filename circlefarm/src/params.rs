use crate::error::{FarmError, FarmResult};

/// Immutable snapshot of every user-supplied generation setting. Validated
/// once before a batch starts; the engine assumes a valid bundle after that.
#[derive(Clone, Debug)]
pub struct GenParams {
    pub alpha_min: f32,
    pub alpha_max: f32,
    pub alpha_noise: f32,
    pub color_noise: f32,

    pub file_name_base: String,
    pub training_postfix: String,
    pub testing_postfix: String,
    /// Digit width indices are left-padded to; wider indices stay intact.
    pub leading_zeros: usize,

    pub target_min: u32,
    pub target_max: u32,
    pub max_overlap: u32,
    pub max_tries: u32,
    /// Palette size, clamped to [1, 6] at draw time.
    pub num_colors: u32,

    pub output_width: u32,
    pub output_height: u32,
    pub start_index: u32,
    pub end_index: u32,
}

impl GenParams {
    pub fn validate(&self) -> FarmResult<()> {
        let floats = [
            self.alpha_min,
            self.alpha_max,
            self.alpha_noise,
            self.color_noise,
        ];
        if floats.iter().any(|v| !v.is_finite()) {
            return Err(FarmError::validation(
                "alpha/color settings must be finite numbers",
            ));
        }
        if self.alpha_min < 0.0 || self.alpha_max > 1.0 {
            return Err(FarmError::validation(
                "alpha_min/alpha_max must lie in [0, 1]",
            ));
        }
        if self.alpha_min > self.alpha_max {
            return Err(FarmError::validation(
                "alpha_min cannot be greater than alpha_max",
            ));
        }
        if self.alpha_noise < 0.0 {
            return Err(FarmError::validation("alpha_noise cannot be negative"));
        }
        if self.color_noise < 0.0 {
            return Err(FarmError::validation("color_noise cannot be negative"));
        }
        if self.target_min > self.target_max {
            return Err(FarmError::validation(
                "target_min cannot be greater than target_max",
            ));
        }
        if self.max_tries == 0 {
            return Err(FarmError::validation("max_tries must be positive"));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(FarmError::validation(
                "output_width/output_height must be positive",
            ));
        }
        if self.end_index < self.start_index {
            return Err(FarmError::validation(
                "end_index must be >= start_index",
            ));
        }
        Ok(())
    }
}
