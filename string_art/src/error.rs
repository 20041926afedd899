use thiserror::Error;

use crate::Grid;

/// Failure of a generation run. Nothing is generated when one of these is returned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed decoding the source image: {0}")]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("At least {required} pins are needed for a minimum separation of {separation}, got {count}.")]
    NotEnoughPins {
        count: usize,
        required: usize,
        separation: usize,
    },
    #[error("The minimum separation between linked pins must be greater than zero.")]
    ZeroSeparation,
    #[error("The working size must be greater than zero.")]
    ZeroWorkingSize,
    #[error("The working size {size} is too large, the maximum is {max}.")]
    WorkingSizeTooLarge { size: usize, max: usize },
    #[error("The output size must be greater than zero.")]
    ZeroOutputSize,
    #[error("The output size {size} is too large, the maximum is {max}.")]
    OutputSizeTooLarge { size: usize, max: usize },
    #[error("The line width must be greater than zero.")]
    ZeroLineWidth,
    #[error("Invalid penalty {0}.")]
    InvalidPenalty(f32),
    #[error("Invalid line darkness {0}, it must be in the range [0, 255].")]
    InvalidLineDarkness(f32),
    #[error("The working image must be a non empty square, got {width}x{height}.")]
    NotSquare { width: usize, height: usize },
    #[error("The working image pixel {index} is outside the intensity range [0, 255].")]
    IntensityOutOfRange { index: usize },
    #[error("The working image grid {image:?} does not match the pin grid {pins:?}.")]
    GridMismatch { image: Grid, pins: Grid },
    #[error("The source image is empty.")]
    EmptyImage,
}
