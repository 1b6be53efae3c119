/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the image has a zero-sized dimension.
    #[error("Image size ({0}, {1}) must be non-zero in both dimensions")]
    ZeroSizeImage(usize, usize),

    /// Error when data length and shape do not agree.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two image sizes do not match.
    #[error("Image size ({0}, {1}) does not match the expected size ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel coordinate is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when casting pixel data to another type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid number of histogram bins ({0})")]
    InvalidHistogramBins(usize),

    /// Error when the number of mixture modes is invalid.
    #[error("Invalid number of mixture modes ({0}), must be at least 1")]
    InvalidMixtureModes(usize),
}
