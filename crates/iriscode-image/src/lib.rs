#![deny(missing_docs)]
//! Image types shared by the iriscode localization and feature pipelines.

/// image representation for the iris pipelines.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
