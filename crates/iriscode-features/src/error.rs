use iriscode_image::ImageError;

/// An error type for the feature extraction module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FeatureError {
    /// The region left for block statistics is empty.
    #[error("Empty region of size {width}x{height}")]
    EmptyRegion {
        /// Width of the region.
        width: usize,
        /// Height of the region.
        height: usize,
    },

    /// The filter bank or block layout cannot be built from the configuration.
    #[error("Invalid filter bank configuration: {0}")]
    InvalidBankConfig(String),

    /// Error from an image operation.
    #[error("Image operation failed. {0}")]
    Image(#[from] ImageError),
}
