//! Canny edge detection.
//!
//! Sobel gradients with an L1 magnitude, 4-direction non-maximum suppression
//! and hysteresis thresholding over the 8-neighbourhood.

use iriscode_image::{Image, ImageError};

use crate::filter::spatial_gradient;

const TAN_22_5_DEG: f32 = 0.414_213_56;

/// Value written for edge pixels in the output map.
pub const EDGE: u8 = 255;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Label {
    NotEdge,
    Weak,
    Strong,
}

/// Gradient images produced by [`canny_with_gradients`].
pub struct Gradients {
    /// Horizontal derivative.
    pub dx: Image<f32, 1>,
    /// Vertical derivative.
    pub dy: Image<f32, 1>,
}

/// Detect edges with the Canny algorithm.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1), usually pre-smoothed.
/// * `dst` - The edge map with shape (H, W, 1), set to [`EDGE`] on edges and 0 elsewhere.
/// * `low_threshold` - Magnitudes above it may continue an edge.
/// * `high_threshold` - Magnitudes above it start an edge.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::edges::canny;
///
/// let size = ImageSize { width: 8, height: 6 };
/// let image = Image::<u8, 1>::from_fn(size, |x, _| if x < 4 { 0 } else { 200 }).unwrap();
///
/// let mut edges = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// canny(&image, &mut edges, 20.0, 30.0).unwrap();
///
/// // a vertical step yields a single vertical edge line
/// let columns = (0..8)
///     .filter(|&x| edges.get_pixel(x, 2, 0).unwrap() > 0)
///     .collect::<Vec<_>>();
/// assert_eq!(columns.len(), 1);
/// ```
pub fn canny(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<(), ImageError> {
    canny_with_gradients(src, dst, low_threshold, high_threshold).map(|_| ())
}

/// Same as [`canny`], also returning the Sobel derivatives it was computed from.
pub fn canny_with_gradients(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<Gradients, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };

    let mut dx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut dy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    spatial_gradient(src, &mut dx, &mut dy)?;

    let (rows, cols) = (src.rows(), src.cols());
    let mag = dx
        .as_slice()
        .iter()
        .zip(dy.as_slice().iter())
        .map(|(gx, gy)| gx.abs() + gy.abs())
        .collect::<Vec<_>>();

    // magnitudes outside the image count as zero
    let mag_at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= cols as isize || y >= rows as isize {
            0.0
        } else {
            mag[y as usize * cols + x as usize]
        }
    };

    let mut labels = vec![Label::NotEdge; rows * cols];
    let mut stack = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let idx = y * cols + x;
            let m = mag[idx];
            if m <= low {
                continue;
            }

            let gx = dx.as_slice()[idx];
            let gy = dy.as_slice()[idx];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let (xi, yi) = (x as isize, y as isize);

            let is_max = if abs_gy < abs_gx * TAN_22_5_DEG {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if abs_gy > abs_gx * (TAN_22_5_DEG + 2.0) {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                let s = if (gx < 0.0) != (gy < 0.0) { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };

            if !is_max {
                continue;
            }

            if m > high {
                labels[idx] = Label::Strong;
                stack.push(idx);
            } else {
                labels[idx] = Label::Weak;
            }
        }
    }

    // hysteresis: grow strong edges through connected weak candidates
    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % cols) as isize, (idx / cols) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= cols as isize || ny >= rows as isize {
                    continue;
                }
                let nidx = ny as usize * cols + nx as usize;
                if labels[nidx] == Label::Weak {
                    labels[nidx] = Label::Strong;
                    stack.push(nidx);
                }
            }
        }
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(labels.iter())
        .for_each(|(out, label)| {
            *out = if *label == Label::Strong { EDGE } else { 0 };
        });

    Ok(Gradients { dx, dy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iriscode_image::ImageSize;

    #[test]
    fn test_canny_flat_has_no_edges() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 10,
            height: 10,
        };
        let img = Image::<u8, 1>::from_size_val(size, 120)?;
        let mut edges = Image::<u8, 1>::from_size_val(size, 0)?;

        canny(&img, &mut edges, 20.0, 30.0)?;
        assert!(edges.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }

    #[test]
    fn test_canny_disk_boundary() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 40,
            height: 40,
        };
        let img = Image::<u8, 1>::from_fn(size, |x, y| {
            let (dx, dy) = (x as f32 - 20.0, y as f32 - 20.0);
            if dx * dx + dy * dy <= 100.0 {
                20
            } else {
                180
            }
        })?;
        let mut edges = Image::<u8, 1>::from_size_val(size, 0)?;

        let grads = canny_with_gradients(&img, &mut edges, 20.0, 30.0)?;
        assert_eq!(grads.dx.size(), size);

        let mut count = 0;
        for y in 0..40 {
            for x in 0..40 {
                if edges.get_pixel(x, y, 0)? == EDGE {
                    count += 1;
                    let d = ((x as f32 - 20.0).powi(2) + (y as f32 - 20.0).powi(2)).sqrt();
                    assert!((8.0..=12.0).contains(&d), "edge at distance {d}");
                }
            }
        }
        // the boundary ring is closed and thin
        assert!(count > 40 && count < 120, "edge count {count}");

        Ok(())
    }

    #[test]
    fn test_canny_weak_edges_need_strong_seed() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 10,
            height: 6,
        };
        // a step of 6 gives a magnitude of 24: above low, below high
        let img = Image::<u8, 1>::from_fn(size, |x, _| if x < 5 { 100 } else { 106 })?;
        let mut edges = Image::<u8, 1>::from_size_val(size, 0)?;

        canny(&img, &mut edges, 20.0, 30.0)?;
        assert!(edges.as_slice().iter().all(|&v| v == 0));

        canny(&img, &mut edges, 20.0, 23.0)?;
        assert!(edges.as_slice().iter().any(|&v| v == EDGE));

        Ok(())
    }
}
