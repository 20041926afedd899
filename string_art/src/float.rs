use std::fmt::{Debug, Display};

use num_traits::{ConstOne, ConstZero};

/// Scalar used by the working intensity array.
pub trait Float:
    'static
    + Debug
    + Display
    + Sync
    + Send
    + num_traits::Float
    + num_traits::NumCast
    + ConstZero
    + ConstOne
{
    const HALF: Self;
    const TWO: Self;
    const PI: Self;
    /// Intensity of a white pixel, the ceiling of every intensity grid.
    const TWO_FIVE_FIVE: Self;

    /// Clamps `self` into the valid intensity range `[0, 255]`.
    fn clamp_intensity(self) -> Self {
        num_traits::Float::min(num_traits::Float::max(self, Self::ZERO), Self::TWO_FIVE_FIVE)
    }
}

impl Float for f32 {
    const HALF: Self = 0.5;
    const TWO: Self = 2.0;
    const PI: Self = core::f32::consts::PI;
    const TWO_FIVE_FIVE: Self = 255.0;
}

impl Float for f64 {
    const HALF: Self = 0.5;
    const TWO: Self = 2.0;
    const PI: Self = core::f64::consts::PI;
    const TWO_FIVE_FIVE: Self = 255.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_intensity_range() {
        assert_eq!((-3.0f32).clamp_intensity(), 0.0);
        assert_eq!(300.0f64.clamp_intensity(), 255.0);
        assert_eq!(12.5f32.clamp_intensity(), 12.5);
    }
}
