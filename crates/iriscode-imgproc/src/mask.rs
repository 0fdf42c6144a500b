use iriscode_image::Image;

use crate::parallel;

/// A region defined by the distance to a circle center.
///
/// Boundaries are inclusive: a pixel at exactly the radius belongs to the region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CircleRegion {
    /// Pixels with `d <= radius`.
    Inside {
        /// Radius of the disk.
        radius: f64,
    },
    /// Pixels with `d >= radius`.
    Outside {
        /// Radius of the excluded disk.
        radius: f64,
    },
    /// Pixels with `inner <= d <= outer`.
    Annulus {
        /// Inner radius.
        inner: f64,
        /// Outer radius.
        outer: f64,
    },
}

impl CircleRegion {
    /// Whether a squared distance to the center falls in the region.
    pub fn contains(&self, dist_sq: f64) -> bool {
        match *self {
            CircleRegion::Inside { radius } => dist_sq <= radius * radius,
            CircleRegion::Outside { radius } => dist_sq >= radius * radius,
            CircleRegion::Annulus { inner, outer } => {
                dist_sq >= inner * inner && dist_sq <= outer * outer
            }
        }
    }
}

/// Set every pixel of `region` around `center` to `value`.
///
/// # Arguments
///
/// * `image` - The image to modify in place.
/// * `center` - The circle center `(x, y)` in pixel coordinates.
/// * `region` - The region to fill.
/// * `value` - The value to write.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::mask::{fill_circle_region, CircleRegion};
///
/// let mut image = Image::<u8, 1>::from_size_val(ImageSize { width: 5, height: 5 }, 9).unwrap();
/// fill_circle_region(&mut image, (2.0, 2.0), CircleRegion::Inside { radius: 1.0 }, 0);
///
/// assert_eq!(image.as_slice().iter().filter(|&&v| v == 0).count(), 5);
/// ```
pub fn fill_circle_region<T>(
    image: &mut Image<T, 1>,
    center: (f64, f64),
    region: CircleRegion,
    value: T,
) where
    T: Copy + Send + Sync,
{
    let (cx, cy) = center;
    parallel::par_iter_pixels_indexed_mut(image, |x, y, pixel| {
        let (dx, dy) = (x as f64 - cx, y as f64 - cy);
        if region.contains(dx * dx + dy * dy) {
            *pixel = value;
        }
    });
}
