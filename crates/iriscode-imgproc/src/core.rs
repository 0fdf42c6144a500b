use iriscode_image::{Image, ImageError};

/// Compute the standard deviation and mean of a rectangular region of a grayscale image.
///
/// The mean is computed first and the population standard deviation from the
/// centered values in a second pass, so a constant region has a standard
/// deviation of exactly zero.
///
/// # Arguments
///
/// * `image` - The input image.
/// * `x` - The left column of the region.
/// * `y` - The top row of the region.
/// * `width` - The width of the region.
/// * `height` - The height of the region.
///
/// # Returns
///
/// A tuple `(std, mean)`. An empty region yields `(0.0, 0.0)`.
///
/// # Example
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::core::std_mean_roi;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 2 },
///     vec![2, 4, 100, 4, 6, 100],
/// ).unwrap();
///
/// let (std, mean) = std_mean_roi(&image, 0, 0, 2, 2).unwrap();
///
/// assert_eq!(mean, 4.0);
/// assert_eq!(std, 2.0_f64.sqrt());
/// ```
pub fn std_mean_roi(
    image: &Image<u8, 1>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<(f64, f64), ImageError> {
    if x + width > image.cols() || y + height > image.rows() {
        return Err(ImageError::RegionOutOfBounds(
            x,
            y,
            width,
            height,
            image.cols(),
            image.rows(),
        ));
    }

    let n = width * height;
    if n == 0 {
        return Ok((0.0, 0.0));
    }

    let rows = || {
        image
            .as_slice()
            .chunks_exact(image.cols())
            .skip(y)
            .take(height)
            .map(move |row| &row[x..x + width])
    };

    let sum = rows()
        .flat_map(|row| row.iter())
        .fold(0u64, |acc, &v| acc + v as u64);
    let mean = sum as f64 / n as f64;

    let sq_sum = rows()
        .flat_map(|row| row.iter())
        .fold(0f64, |acc, &v| acc + (v as f64 - mean).powi(2));

    Ok(((sq_sum / n as f64).sqrt(), mean))
}
