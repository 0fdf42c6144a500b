#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image basic operations module.
pub mod core;

/// image cropping module.
pub mod crop;

/// edge detection module.
pub mod edges;

/// image filtering module.
pub mod filter;

/// circle detection module.
pub mod hough;

/// circular region masking module.
pub mod mask;

/// image moments module.
pub mod moments;

/// module containing parallization utilities.
pub mod parallel;

/// row and column projection profiles.
pub mod projection;

/// operations to threshold images.
pub mod threshold;
