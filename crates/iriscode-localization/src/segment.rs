use iriscode_image::Image;
use iriscode_imgproc::mask::{fill_circle_region, CircleRegion};

use crate::circle::CircleSet;

/// Blank everything that is not iris: pixels on or inside the pupil circle and
/// pixels on or outside the iris circle are set to 0.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_localization::{segment_iris, Circle, CircleSet};
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 9, height: 9 }, 100).unwrap();
/// let circles = CircleSet {
///     pupil: Circle::new(4, 4, 1),
///     iris: Circle::new(4, 4, 3),
/// };
///
/// let segmented = segment_iris(&image, &circles);
/// assert_eq!(segmented.get_pixel(4, 4, 0).unwrap(), 0);
/// assert_eq!(segmented.get_pixel(6, 4, 0).unwrap(), 100);
/// assert_eq!(segmented.get_pixel(7, 4, 0).unwrap(), 0);
/// ```
pub fn segment_iris(image: &Image<u8, 1>, circles: &CircleSet) -> Image<u8, 1> {
    let mut segmented = image.clone();
    fill_circle_region(
        &mut segmented,
        circles.pupil.center_f64(),
        CircleRegion::Inside {
            radius: circles.pupil.radius as f64,
        },
        0,
    );
    fill_circle_region(
        &mut segmented,
        circles.iris.center_f64(),
        CircleRegion::Outside {
            radius: circles.iris.radius as f64,
        },
        0,
    );
    segmented
}
