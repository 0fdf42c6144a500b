use iriscode_image::Image;

/// Raw spatial image moments up to the first order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    /// Zeroth order moment, the total intensity mass.
    pub m00: f64,
    /// First order moment along x.
    pub m10: f64,
    /// First order moment along y.
    pub m01: f64,
}

impl Moments {
    /// Intensity-weighted center of mass `(x, y)`, `None` for an image without mass.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Compute the raw spatial moments of a grayscale image, pixel values used as weights.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::moments::moments;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 2 }, vec![
///     0, 0, 0,
///     0, 0, 10,
/// ]).unwrap();
///
/// let m = moments(&image);
/// assert_eq!(m.m00, 10.0);
/// assert_eq!(m.centroid(), Some((2.0, 1.0)));
/// ```
pub fn moments(src: &Image<u8, 1>) -> Moments {
    let cols = src.cols().max(1);
    src.as_slice()
        .chunks_exact(cols)
        .enumerate()
        .fold(Moments::default(), |mut acc, (y, row)| {
            let (mut row_sum, mut row_x) = (0u64, 0u64);
            for (x, &v) in row.iter().enumerate() {
                row_sum += v as u64;
                row_x += x as u64 * v as u64;
            }
            acc.m00 += row_sum as f64;
            acc.m10 += row_x as f64;
            acc.m01 += (y as u64 * row_sum) as f64;
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iriscode_image::{ImageError, ImageSize};

    #[test]
    fn test_moments_symmetric_blob() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 21,
            height: 15,
        };
        let image = Image::<u8, 1>::from_fn(size, |x, y| {
            let (dx, dy) = (x as i32 - 12, y as i32 - 6);
            if dx * dx + dy * dy <= 16 {
                255
            } else {
                0
            }
        })?;

        let m = moments(&image);
        assert_eq!(m.centroid(), Some((12.0, 6.0)));

        Ok(())
    }

    #[test]
    fn test_moments_empty_mass() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;
        assert_eq!(moments(&image).centroid(), None);

        Ok(())
    }
}
