use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, pin_distancer::PinDistancer};

/// Largest supported working side. Chord pixels are stored as `u32` indexes.
pub const MAX_WORKING_SIZE: usize = u16::MAX as usize;

/// Largest supported output side.
pub const MAX_OUTPUT_SIZE: usize = u16::MAX as usize;

/// How the working array is bleached along a selected chord.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyMode {
    /// Adds `penalty` to every pixel.
    #[default]
    Flat,
    /// Moves every pixel a `penalty` fraction of the way to white.
    Percentage,
}

/// Tunable parameters of a generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of pins around the circle.
    pub pins: usize,
    /// Maximum number of lines to draw.
    pub lines: usize,
    /// Minimum circular distance, in pins, between the two ends of a line.
    pub min_separation: usize,
    /// Side of the square image the search works on.
    pub working_size: usize,
    /// Side of the rendered output image.
    pub output_size: usize,
    pub penalty: f32,
    pub penalty_mode: PenaltyMode,
    /// Intensity removed from the output canvas by a fully covered pixel of a line.
    pub line_darkness: f32,
    /// Width, in output pixels, of a rendered line.
    pub line_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pins: 288,
            lines: 3000,
            min_separation: 20,
            working_size: 480,
            output_size: 960,
            penalty: 40.0,
            penalty_mode: PenaltyMode::Flat,
            line_darkness: 15.0,
            line_width: 1,
        }
    }
}

impl Settings {
    pub fn new(pins: usize, lines: usize) -> Self {
        Self {
            pins,
            lines,
            ..Default::default()
        }
    }

    /// Checks every parameter and returns the pin distancer they describe.
    pub fn validate(&self) -> Result<PinDistancer, ValidationError> {
        if self.working_size == 0 {
            return Err(ValidationError::ZeroWorkingSize);
        }
        if self.working_size > MAX_WORKING_SIZE {
            return Err(ValidationError::WorkingSizeTooLarge {
                size: self.working_size,
                max: MAX_WORKING_SIZE,
            });
        }
        if self.output_size == 0 {
            return Err(ValidationError::ZeroOutputSize);
        }
        if self.output_size > MAX_OUTPUT_SIZE {
            return Err(ValidationError::OutputSizeTooLarge {
                size: self.output_size,
                max: MAX_OUTPUT_SIZE,
            });
        }
        if self.line_width == 0 {
            return Err(ValidationError::ZeroLineWidth);
        }
        let penalty_range = match self.penalty_mode {
            PenaltyMode::Flat => 0.0..=255.0,
            PenaltyMode::Percentage => 0.0..=1.0,
        };
        if !penalty_range.contains(&self.penalty) {
            return Err(ValidationError::InvalidPenalty(self.penalty));
        }
        if !(0.0..=255.0).contains(&self.line_darkness) {
            return Err(ValidationError::InvalidLineDarkness(self.line_darkness));
        }
        PinDistancer::new(self.pins, self.min_separation)
    }
}
