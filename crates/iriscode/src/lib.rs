#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use iriscode_image as image;

#[doc(inline)]
pub use iriscode_imgproc as imgproc;

#[doc(inline)]
pub use iriscode_localization as localization;

#[doc(inline)]
pub use iriscode_features as features;
