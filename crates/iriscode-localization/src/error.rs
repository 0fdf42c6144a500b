use iriscode_image::ImageError;

/// An error type for the localization module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LocalizationError {
    /// The binarized image contains no dark pixel to seed the pupil from.
    #[error("No dark pixel found after binarization")]
    NoDarkPixels,

    /// The row scan from the pupil centroid could not measure a radius.
    #[error("Pupil radius could not be resolved from ({0}, {1})")]
    PupilRadiusUnresolved(usize, usize),

    /// Error from an image operation.
    #[error("Image operation failed. {0}")]
    Image(#[from] ImageError),
}
