//! Coarse pupil estimation from the dark blob of a binarized eye image.

use iriscode_image::{Image, ImageError, ImageSize};
use iriscode_imgproc::{
    crop::crop_image,
    filter::{bitwise_not, median_blur},
    moments::moments,
    projection::{argmax, project, Projections},
    threshold::threshold_binary,
};

use crate::error::LocalizationError;

/// Value of the background pixels of a binarized image.
const BACKGROUND: u8 = 255;

/// A rectangular region of an image, `left..right` by `top..bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelWindow {
    /// First column.
    pub left: usize,
    /// First row.
    pub top: usize,
    /// One past the last column.
    pub right: usize,
    /// One past the last row.
    pub bottom: usize,
}

impl PixelWindow {
    /// Window of the given half extent around `center`, clamped to `size`.
    pub fn around(center: (usize, usize), half_extent: usize, size: ImageSize) -> Self {
        Self {
            left: center.0.saturating_sub(half_extent),
            top: center.1.saturating_sub(half_extent),
            right: (center.0 + half_extent).min(size.width),
            bottom: (center.1 + half_extent).min(size.height),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Size of the window.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height(),
        }
    }

    fn contains(&self, (x, y): (usize, usize)) -> bool {
        (self.left..self.right).contains(&x) && (self.top..self.bottom).contains(&y)
    }
}

/// Binarize an eye image: pixels above `threshold` become 255, the others 0.
pub fn binarize(image: &Image<u8, 1>, threshold: u8) -> Result<Image<u8, 1>, ImageError> {
    let mut binary = Image::from_size_val(image.size(), 0)?;
    threshold_binary(image, &mut binary, threshold, BACKGROUND)?;
    Ok(binary)
}

/// Count the dark pixels of a binary image per column and per row.
pub fn dark_projections(binary: &Image<u8, 1>) -> Projections {
    project(binary, |v| v == 0)
}

/// Seed the pupil center at the column and row with the most dark pixels.
///
/// The first maximum wins on ties.
///
/// # Errors
///
/// Returns [`LocalizationError::NoDarkPixels`] when the projections are empty.
pub fn seed_from_projections(projections: &Projections) -> Result<(usize, usize), LocalizationError> {
    if projections.total() == 0 {
        return Err(LocalizationError::NoDarkPixels);
    }
    match (argmax(&projections.cols), argmax(&projections.rows)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(LocalizationError::NoDarkPixels),
    }
}

/// Grow a window around `seed` until it encloses the dark blob.
///
/// Starting from a window of `half_extent` around the seed, every edge whose
/// midpoint is still dark moves outward by `step` pixels, clamped to the image.
/// Growth stops once no edge moves. A zero half extent is raised to 1 so the
/// window always holds the seed.
pub fn grow_pupil_window(
    binary: &Image<u8, 1>,
    seed: (usize, usize),
    half_extent: usize,
    step: usize,
) -> Result<PixelWindow, ImageError> {
    let size = binary.size();
    if seed.0 >= size.width || seed.1 >= size.height {
        return Err(ImageError::PixelIndexOutOfBounds(
            seed.0,
            seed.1,
            size.width,
            size.height,
        ));
    }

    let mut window = PixelWindow::around(seed, half_extent.max(1), size);
    let is_dark = |x: usize, y: usize| -> Result<bool, ImageError> {
        Ok(binary.get_pixel(x, y, 0)? == 0)
    };

    loop {
        let mid_x = window.left + window.width() / 2;
        let mid_y = window.top + window.height() / 2;
        let mut next = window;

        if is_dark(mid_x, window.top)? {
            next.top = window.top.saturating_sub(step);
        }
        if is_dark(mid_x, window.bottom - 1)? {
            next.bottom = (window.bottom + step).min(size.height);
        }
        if is_dark(window.left, mid_y)? {
            next.left = window.left.saturating_sub(step);
        }
        if is_dark(window.right - 1, mid_y)? {
            next.right = (window.right + step).min(size.width);
        }

        if next == window {
            return Ok(window);
        }
        log::trace!("pupil window grown to {:?}", next);
        window = next;
    }
}

/// Locate the pupil centroid inside `window`, in image coordinates.
///
/// The window is median filtered and inverted so the pupil carries the mass,
/// and the centroid is the floor of the first order moments over the mass.
/// A window without mass falls back to `seed`.
pub fn refine_centroid(
    binary: &Image<u8, 1>,
    window: &PixelWindow,
    seed: (usize, usize),
    median_kernel_size: usize,
) -> Result<(usize, usize), ImageError> {
    let mut region = Image::from_size_val(window.size(), 0u8)?;
    crop_image(binary, &mut region, window.left, window.top)?;

    let mut smoothed = Image::from_size_val(window.size(), 0u8)?;
    median_blur(&region, &mut smoothed, median_kernel_size)?;
    bitwise_not(&smoothed, &mut region)?;

    match moments(&region).centroid() {
        Some((cx, cy)) => Ok((
            window.left + cx.floor() as usize,
            window.top + cy.floor() as usize,
        )),
        None => {
            log::debug!("pupil window without mass, keeping seed {:?}", seed);
            Ok(seed)
        }
    }
}

/// Estimate the pupil radius from the dark run through `center` along its row.
///
/// The distances from `center` to the first background pixel on the left and
/// on the right are averaged with integer division.
///
/// # Errors
///
/// Returns [`LocalizationError::PupilRadiusUnresolved`] if a run reaches the
/// window boundary without meeting background, or if the radius is zero.
pub fn estimate_pupil_radius(
    binary: &Image<u8, 1>,
    window: &PixelWindow,
    center: (usize, usize),
) -> Result<u32, LocalizationError> {
    let unresolved = || LocalizationError::PupilRadiusUnresolved(center.0, center.1);
    if !window.contains(center) {
        return Err(unresolved());
    }

    let row = binary.row(center.1).ok_or_else(unresolved)?;
    let row = &row[window.left..window.right];
    let x = center.0 - window.left;

    let left = row[..=x].iter().rev().position(|&v| v == BACKGROUND);
    let right = row[x..].iter().position(|&v| v == BACKGROUND);

    match (left, right) {
        (Some(left), Some(right)) => {
            let radius = ((left + right) / 2) as u32;
            if radius == 0 {
                return Err(unresolved());
            }
            Ok(radius)
        }
        _ => Err(unresolved()),
    }
}
