use iriscode_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use super::border::{reflect_101, replicate};
use super::{kernels, separable_filter};

fn check_same_size<A, B, const C1: usize, const C2: usize>(
    src: &Image<A, C1>,
    dst: &Image<B, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
/// * `sigma` - The sigma of the gaussian kernel, non-positive values are derived
///   from the kernel size.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
) -> Result<(), ImageError> {
    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma.0);
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)
}

/// Correlate a grayscale image with an arbitrary 2D kernel.
///
/// The kernel anchor is its center, borders are reflected without repeating the
/// edge pixel, the sum is accumulated in `f32`, rounded half to even and saturated to `u8`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel` - The kernel, with odd width and height.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::filter::filter2d;
///
/// let size = ImageSize { width: 3, height: 3 };
/// let image = Image::<u8, 1>::new(size, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]).unwrap();
///
/// // shift right by one pixel
/// let kernel = Image::<f32, 1>::new(ImageSize { width: 3, height: 1 }, vec![1.0, 0.0, 0.0]).unwrap();
///
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// filter2d(&image, &mut dst, &kernel).unwrap();
///
/// assert_eq!(dst.as_slice(), &[20, 10, 20, 50, 40, 50, 80, 70, 80]);
/// ```
pub fn filter2d(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &Image<f32, 1>,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    let (kw, kh) = (kernel.cols(), kernel.rows());
    for len in [kw, kh] {
        if len == 0 || len % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(len));
        }
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    // pad once so that the inner loop reads contiguous rows
    let (ax, ay) = (kw / 2, kh / 2);
    let padded_cols = cols + 2 * ax;
    let padded_rows = rows + 2 * ay;
    let src_data = src.as_slice();
    let mut padded = vec![0.0f32; padded_cols * padded_rows];
    padded
        .par_chunks_exact_mut(padded_cols)
        .enumerate()
        .for_each(|(py, padded_row)| {
            let sy = reflect_101(py as isize - ay as isize, rows);
            let src_row = &src_data[sy * cols..(sy + 1) * cols];
            for (px, out) in padded_row.iter_mut().enumerate() {
                *out = src_row[reflect_101(px as isize - ax as isize, cols)] as f32;
            }
        });

    let kernel_data = kernel.as_slice();
    let padded = &padded;
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for (c, out) in dst_row.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (ky, kernel_row) in kernel_data.chunks_exact(kw).enumerate() {
                    let offset = (r + ky) * padded_cols + c;
                    let window = &padded[offset..offset + kw];
                    acc += window
                        .iter()
                        .zip(kernel_row.iter())
                        .map(|(&p, &k)| p * k)
                        .sum::<f32>();
                }
                *out = acc.round_ties_even().clamp(0.0, 255.0) as u8;
            }
        });

    Ok(())
}

/// Compute the first order image derivative in both x and y using a 3x3 Sobel operator.
///
/// The kernels are not normalized, borders are reflected without repeating the edge pixel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dx` - The horizontal derivative with shape (H, W, 1).
/// * `dy` - The vertical derivative with shape (H, W, 1).
pub fn spatial_gradient(
    src: &Image<u8, 1>,
    dx: &mut Image<f32, 1>,
    dy: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    check_same_size(src, dx)?;
    check_same_size(src, dy)?;

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let (sobel_x, sobel_y) = kernels::sobel_kernel_3x3();
    let src_data = src.as_slice();

    dx.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(dy.as_slice_mut().par_chunks_exact_mut(cols))
        .enumerate()
        .for_each(|(r, (dx_row, dy_row))| {
            for c in 0..cols {
                let mut sum_x = 0.0f32;
                let mut sum_y = 0.0f32;
                for (ky, (kx_row, ky_row)) in sobel_x.iter().zip(sobel_y.iter()).enumerate() {
                    let y = reflect_101(r as isize + ky as isize - 1, rows);
                    for kx in 0..3 {
                        let x = reflect_101(c as isize + kx as isize - 1, cols);
                        let val = src_data[y * cols + x] as f32;
                        sum_x += val * kx_row[kx];
                        sum_y += val * ky_row[kx];
                    }
                }
                dx_row[c] = sum_x;
                dy_row[c] = sum_y;
            }
        });

    Ok(())
}

/// Blur an image with a median filter.
///
/// Each output pixel is the median of the `kernel_size x kernel_size` neighbourhood,
/// borders are handled by replicating the edge pixels.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - Odd aperture size.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::filter::median_blur;
///
/// let size = ImageSize { width: 3, height: 3 };
/// let image = Image::<u8, 1>::new(size, vec![0, 0, 0, 0, 255, 0, 0, 0, 0]).unwrap();
///
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// median_blur(&image, &mut dst, 3).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn median_blur(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let half = (kernel_size / 2) as isize;
    let mid = kernel_size * kernel_size / 2;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, dst_row)| {
            let mut window = Vec::with_capacity(kernel_size * kernel_size);
            for (c, out) in dst_row.iter_mut().enumerate() {
                window.clear();
                for dy in -half..=half {
                    let y = replicate(r as isize + dy, rows);
                    for dx in -half..=half {
                        let x = replicate(c as isize + dx, cols);
                        window.push(src_data[y * cols + x]);
                    }
                }
                let (_, median, _) = window.select_nth_unstable(mid);
                *out = *median;
            }
        });

    Ok(())
}

/// Invert the intensities of an 8-bit image, `dst = 255 - src`.
pub fn bitwise_not(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    src.as_slice()
        .par_chunks(src.cols().max(1))
        .zip(dst.as_slice_mut().par_chunks_mut(src.cols().max(1)))
        .for_each(|(src_row, dst_row)| {
            src_row
                .iter()
                .zip(dst_row.iter_mut())
                .for_each(|(&s, d)| *d = !s);
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iriscode_image::ImageSize;

    #[test]
    fn test_gaussian_blur_flat() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 5,
        };
        let img = Image::<u8, 1>::from_size_val(size, 137)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        gaussian_blur(&img, &mut dst, (5, 5), (0.0, 0.0))?;
        assert!(dst.as_slice().iter().all(|&v| v == 137));

        Ok(())
    }

    #[test]
    fn test_gaussian_blur_impulse() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let mut img = Image::<u8, 1>::from_size_val(size, 0)?;
        img.set_pixel(2, 2, 0, 255)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        gaussian_blur(&img, &mut dst, (5, 5), (0.0, 0.0))?;

        // the reflected border folds both outer taps onto the impulse
        assert_eq!(dst.get_pixel(2, 2, 0)?, 36);
        assert_eq!(dst.get_pixel(0, 0, 0)?, 4);
        assert_eq!(dst.get_pixel(2, 0, 0)?, 12);

        Ok(())
    }

    #[test]
    fn test_filter2d_flat() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 7,
            height: 4,
        };
        let img = Image::<u8, 1>::from_size_val(size, 90)?;
        let kernel = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            1.0 / 37.5,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        filter2d(&img, &mut dst, &kernel)?;
        assert!(dst.as_slice().iter().all(|&v| v == 60));

        Ok(())
    }

    #[test]
    fn test_filter2d_saturates() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let img = Image::<u8, 1>::from_size_val(size, 200)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        let double = Image::<f32, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![2.0],
        )?;
        filter2d(&img, &mut dst, &double)?;
        assert!(dst.as_slice().iter().all(|&v| v == 255));

        let negative = Image::<f32, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![-1.0],
        )?;
        filter2d(&img, &mut dst, &negative)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }

    #[test]
    fn test_filter2d_rounds_half_to_even() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let img = Image::<u8, 1>::new(size, vec![5, 7, 1, 3])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        let half = Image::<f32, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![0.5],
        )?;
        filter2d(&img, &mut dst, &half)?;
        assert_eq!(dst.as_slice(), &[2, 4, 0, 2]);

        Ok(())
    }

    #[test]
    fn test_spatial_gradient() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 4,
        };
        // horizontal ramp: I(x, y) = 10 x
        let img = Image::<u8, 1>::from_fn(size, |x, _| (10 * x) as u8)?;
        let mut dx = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let mut dy = Image::<f32, 1>::from_size_val(size, 0.0)?;

        spatial_gradient(&img, &mut dx, &mut dy)?;

        // inner pixels see (I(x+1) - I(x-1)) * (1 + 2 + 1)
        assert_eq!(dx.get_pixel(2, 1, 0)?, 80.0);
        // reflected borders cancel the derivative
        assert_eq!(dx.get_pixel(0, 1, 0)?, 0.0);
        assert!(dy.as_slice().iter().all(|&v| v == 0.0));

        Ok(())
    }

    #[test]
    fn test_median_blur_removes_speckles() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let mut img = Image::<u8, 1>::from_size_val(size, 255)?;
        img.set_pixel(4, 4, 0, 0)?;
        img.set_pixel(1, 7, 0, 0)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        median_blur(&img, &mut dst, 7)?;
        assert!(dst.as_slice().iter().all(|&v| v == 255));

        assert_eq!(
            median_blur(&img, &mut dst, 4),
            Err(ImageError::InvalidKernelSize(4))
        );

        Ok(())
    }

    #[test]
    fn test_bitwise_not() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let img = Image::<u8, 1>::new(size, vec![0, 255, 64, 200])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        bitwise_not(&img, &mut dst)?;
        assert_eq!(dst.as_slice(), &[255, 0, 191, 55]);

        Ok(())
    }
}
