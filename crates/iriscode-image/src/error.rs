/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}, {1}) mismatch ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds {1}")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a requested region does not fit inside the image.
    #[error("Region at ({0}, {1}) of size {2}x{3} exceeds image bounds {4}x{5}")]
    RegionOutOfBounds(usize, usize, usize, usize, usize, usize),

    /// Error when a filter kernel has an unsupported size.
    #[error("Invalid kernel size {0}: must be odd and non-zero")]
    InvalidKernelSize(usize),
}
