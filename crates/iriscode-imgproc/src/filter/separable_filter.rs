use iriscode_image::{Image, ImageError};
use rayon::prelude::*;

use super::border::reflect_101;

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
///
/// This struct caches the kernel data and precomputed offsets.
struct SeparableFilter {
    kernel_x: Vec<f32>,
    kernel_y: Vec<f32>,
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl SeparableFilter {
    fn new(kernel_x: &[f32], kernel_y: &[f32]) -> Self {
        let half_x = kernel_x.len() / 2;
        let half_y = kernel_y.len() / 2;

        let offsets_x = (0..kernel_x.len())
            .map(|i| i as isize - half_x as isize)
            .collect();

        let offsets_y = (0..kernel_y.len())
            .map(|i| i as isize - half_y as isize)
            .collect();

        Self {
            kernel_x: kernel_x.to_vec(),
            kernel_y: kernel_y.to_vec(),
            offsets_x,
            offsets_y,
        }
    }

    fn apply(&self, src: &Image<u8, 1>, dst: &mut Image<u8, 1>) {
        let rows = src.rows();
        let cols = src.cols();
        if rows == 0 || cols == 0 {
            return;
        }

        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        // Horizontal
        temp.par_chunks_mut(cols)
            .zip(src_data.par_chunks(cols))
            .for_each(|(row_temp, src_row)| {
                for (c, out) in row_temp.iter_mut().enumerate() {
                    *out = self
                        .kernel_x
                        .iter()
                        .zip(self.offsets_x.iter())
                        .map(|(&k, &off)| src_row[reflect_101(c as isize + off, cols)] as f32 * k)
                        .sum();
                }
            });

        // Vertical
        let temp = &temp;
        dst.as_slice_mut()
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(r, dst_row)| {
                for (c, out) in dst_row.iter_mut().enumerate() {
                    let acc: f32 = self
                        .kernel_y
                        .iter()
                        .zip(self.offsets_y.iter())
                        .map(|(&k, &off)| temp[reflect_101(r as isize + off, rows) * cols + c] * k)
                        .sum();
                    *out = acc.round_ties_even().clamp(0.0, 255.0) as u8;
                }
            });
    }
}

/// Apply a separable filter to a grayscale image.
///
/// Borders are handled by reflection without repeating the edge pixel, and the
/// result is rounded half to even and saturated to `u8`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_x` - The horizontal kernel, odd length.
/// * `kernel_y` - The vertical kernel, odd length.
pub fn separable_filter(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    for len in [kernel_x.len(), kernel_y.len()] {
        if len == 0 || len % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(len));
        }
    }

    SeparableFilter::new(kernel_x, kernel_y).apply(src, dst);

    Ok(())
}
