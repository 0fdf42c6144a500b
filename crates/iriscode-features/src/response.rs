use iriscode_image::{Image, ImageError};
use iriscode_imgproc::filter::filter2d;
use rayon::prelude::*;

use crate::{bank::FilterBank, error::FeatureError};

/// Pixel-wise maximum of two images of the same size, written into the first.
fn max_into(mut acc: Image<u8, 1>, other: Image<u8, 1>) -> Image<u8, 1> {
    acc.as_slice_mut()
        .iter_mut()
        .zip(other.as_slice())
        .for_each(|(a, &b)| *a = (*a).max(b));
    acc
}

/// Correlate the image with every kernel of the bank and keep, for every pixel,
/// the strongest 8-bit response.
///
/// The kernels are evaluated in parallel and combined with a pixel-wise maximum,
/// so the result does not depend on the order of the bank.
///
/// # Errors
///
/// Returns [`FeatureError::InvalidBankConfig`] for an empty bank.
pub fn max_response(image: &Image<u8, 1>, bank: &FilterBank) -> Result<Image<u8, 1>, FeatureError> {
    let response = bank
        .kernels()
        .par_iter()
        .map(|kernel| {
            let mut filtered = Image::from_size_val(image.size(), 0u8)?;
            filter2d(image, &mut filtered, kernel)?;
            Ok::<_, ImageError>(filtered)
        })
        .try_reduce_with(|acc, other| Ok(max_into(acc, other)));

    match response {
        Some(response) => Ok(response?),
        None => Err(FeatureError::InvalidBankConfig(
            "the bank holds no kernel".to_string(),
        )),
    }
}
