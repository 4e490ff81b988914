use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("Invalid bitmap dimensions: The data length must be at least {0} = {1}, but is equal to {2}.")]
    InvalidDataDimensions(&'static str, usize, usize),

    #[error("Images must be at least 2x2 pixels, but {0}x{1} was provided.")]
    ImageTooSmall(usize, usize),

    #[error("The row stride ({stride}) must not be smaller than the image width ({width}).")]
    InvalidStride { stride: usize, width: usize },

    #[error("Radius values must be positive and finite, but {0} was provided.")]
    InvalidRadius(f32),

    #[error("Output is {0}x{1} pixels, but the input is {2}x{3}.")]
    MismatchedDimensions(usize, usize, usize, usize),

    #[error("Scratch grid is sized for {0}x{1} pixels, but the input is {2}x{3}.")]
    InvalidScratchSize(usize, usize, usize, usize),

    #[error("Channel {0} is out of range for pixels with {1} component(s).")]
    InvalidChannel(usize, usize),

    #[error("Unable to allocate scratch space for {pixels} pixels: {source}")]
    ScratchAllocation {
        pixels: usize,
        #[source]
        source: TryReserveError,
    },
}
