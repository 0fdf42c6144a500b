#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pupil and iris boundary fitting.
pub mod boundary;

mod circle;
pub use circle::{Circle, CircleFit, CircleSet, CircleSource, PupilEstimate};

mod config;
pub use config::{CannyConfig, EdgeMaskConfig, HoughConfig, LocalizationConfig};

mod error;
pub use error::LocalizationError;

mod localizer;
pub use localizer::{IrisLocalizer, Localization};

/// Coarse pupil estimation stages.
pub mod pupil;

mod segment;
pub use segment::segment_iris;
