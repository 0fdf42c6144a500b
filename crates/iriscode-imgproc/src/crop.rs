use iriscode_image::{Image, ImageError};
use rayon::prelude::*;

/// Copy the window of a single channel image whose top-left pixel is
/// `(left, top)` into `dst`.
///
/// The window has the size of `dst`. Rows are copied in parallel.
///
/// # Errors
///
/// Returns [`ImageError::RegionOutOfBounds`] if the window reaches past the
/// right or bottom edge of `src`.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::crop::crop_image;
///
/// let binary = Image::<u8, 1>::from_fn(ImageSize { width: 6, height: 5 }, |x, y| {
///     if (2..4).contains(&x) && (1..3).contains(&y) { 0 } else { 255 }
/// }).unwrap();
///
/// let mut window = Image::<u8, 1>::from_size_val(ImageSize { width: 3, height: 2 }, 9).unwrap();
/// crop_image(&binary, &mut window, 2, 1).unwrap();
///
/// assert_eq!(window.as_slice(), &[0, 0, 255, 0, 0, 255]);
/// ```
pub fn crop_image<T>(
    src: &Image<T, 1>,
    dst: &mut Image<T, 1>,
    left: usize,
    top: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let size = dst.size();
    if left + size.width > src.cols() || top + size.height > src.rows() {
        return Err(ImageError::RegionOutOfBounds(
            left,
            top,
            size.width,
            size.height,
            src.cols(),
            src.rows(),
        ));
    }
    if size.width == 0 {
        return Ok(());
    }

    let stride = src.cols();
    let src_data = src.as_slice();
    dst.as_slice_mut()
        .par_chunks_exact_mut(size.width)
        .enumerate()
        .for_each(|(dy, window_row)| {
            let start = (top + dy) * stride + left;
            window_row.copy_from_slice(&src_data[start..start + size.width]);
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iriscode_image::ImageSize;

    #[test]
    fn test_crop_window_at_corner() -> Result<(), ImageError> {
        let src = Image::<u16, 1>::from_fn(
            ImageSize {
                width: 5,
                height: 4,
            },
            |x, y| (100 * y + x) as u16,
        )?;

        let mut window = Image::<u16, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0,
        )?;
        crop_image(&src, &mut window, 3, 1)?;
        assert_eq!(window.as_slice(), &[103, 104, 203, 204, 303, 304]);

        Ok(())
    }

    #[test]
    fn test_crop_empty_window() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            7,
        )?;
        let mut window = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 0,
                height: 3,
            },
            0,
        )?;
        crop_image(&src, &mut window, 4, 1)?;
        assert!(window.as_slice().is_empty());

        Ok(())
    }

    #[test]
    fn test_crop_out_of_bounds() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;
        let mut window = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;

        assert_eq!(
            crop_image(&src, &mut window, 2, 0),
            Err(ImageError::RegionOutOfBounds(2, 0, 3, 2, 4, 4))
        );
        assert_eq!(
            crop_image(&src, &mut window, 0, 3),
            Err(ImageError::RegionOutOfBounds(0, 3, 3, 2, 4, 4))
        );

        Ok(())
    }
}
