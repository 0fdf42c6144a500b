//! Pupil and iris boundary fitting on the masked edge map.

use iriscode_image::{Image, ImageError};
use iriscode_imgproc::{
    edges::{canny_with_gradients, Gradients},
    filter::gaussian_blur,
    hough::{hough_circles, HoughCirclesParams},
    mask::{fill_circle_region, CircleRegion},
};

use crate::{
    circle::{Circle, CircleFit, CircleSource, PupilEstimate},
    config::LocalizationConfig,
};

/// Edge map of the smoothed eye image and the derivatives it was computed from.
pub struct EdgeMap {
    /// Edge pixels are non-zero.
    pub edges: Image<u8, 1>,
    /// Sobel derivatives of the smoothed image.
    pub gradients: Gradients,
}

/// Detect edges on the smoothed image and keep only those near the expected
/// pupil and iris boundaries.
///
/// # Arguments
///
/// * `image` - The grayscale eye image.
/// * `estimate` - Coarse pupil center and radius.
/// * `config` - Localization configuration.
pub fn masked_edges(
    image: &Image<u8, 1>,
    estimate: &PupilEstimate,
    config: &LocalizationConfig,
) -> Result<EdgeMap, ImageError> {
    let k = config.blur_kernel_size;
    let mut blurred = Image::from_size_val(image.size(), 0u8)?;
    gaussian_blur(image, &mut blurred, (k, k), (0.0, 0.0))?;

    let mut edges = Image::from_size_val(image.size(), 0u8)?;
    let gradients = canny_with_gradients(
        &blurred,
        &mut edges,
        config.canny.low_threshold,
        config.canny.high_threshold,
    )?;

    let r = estimate.radius as f64;
    let center = estimate.center_f64();
    let mask = &config.edge_mask;
    fill_circle_region(
        &mut edges,
        center,
        CircleRegion::Outside {
            radius: mask.outer_ratio * r,
        },
        0,
    );
    fill_circle_region(
        &mut edges,
        center,
        CircleRegion::Annulus {
            inner: mask.gap_inner_ratio * r,
            outer: mask.gap_outer_ratio * r,
        },
        0,
    );

    Ok(EdgeMap { edges, gradients })
}

/// Search circles with a radius in `min_radius..=max_radius` and average those
/// centered within the tolerance of the coarse center.
///
/// Returns `None` when no circle qualifies.
pub fn fit_boundary(
    edge_map: &EdgeMap,
    estimate: &PupilEstimate,
    radius_band: (u32, u32),
    config: &LocalizationConfig,
) -> Result<Option<Circle>, ImageError> {
    let hough = &config.hough;
    let circles = hough_circles(
        &edge_map.edges,
        &edge_map.gradients.dx,
        &edge_map.gradients.dy,
        &HoughCirclesParams {
            dp: hough.dp,
            min_dist: hough.min_dist,
            acc_threshold: hough.acc_threshold,
            min_radius: radius_band.0,
            max_radius: radius_band.1,
        },
    )?;

    let (cx, cy) = estimate.center_f64();
    let tolerance = hough.center_tolerance as f64;
    let survivors = circles
        .iter()
        .map(|c| {
            (
                (c.x as f64).round(),
                (c.y as f64).round(),
                (c.radius as f64).round(),
            )
        })
        .filter(|(x, y, _)| (x - cx).abs() <= tolerance && (y - cy).abs() <= tolerance)
        .collect::<Vec<_>>();

    log::debug!(
        "radius band {:?}: {} circles, {} near the pupil center",
        radius_band,
        circles.len(),
        survivors.len()
    );

    if survivors.is_empty() {
        return Ok(None);
    }

    let n = survivors.len() as f64;
    let (sx, sy, sr) = survivors
        .iter()
        .fold((0.0, 0.0, 0.0), |(ax, ay, ar), (x, y, r)| (ax + x, ay + y, ar + r));

    let to_u32 = |v: f64| (v / n).round().max(0.0) as u32;
    Ok(Some(Circle::new(to_u32(sx), to_u32(sy), to_u32(sr))))
}

/// Radius bands of the pupil and iris searches for a coarse pupil radius.
pub fn radius_bands(radius: u32, config: &LocalizationConfig) -> ((u32, u32), (u32, u32)) {
    let hough = &config.hough;
    let pupil = (
        radius.saturating_sub(hough.pupil_band_margin).max(1),
        radius + hough.pupil_band_margin,
    );
    let r = radius as f64;
    let iris = (
        (hough.iris_min_ratio * r).round() as u32,
        (hough.iris_max_ratio * r).round() as u32,
    );
    (pupil, iris)
}

/// Fit the pupil and the iris boundaries, falling back to circles derived from
/// the coarse estimate when a search finds nothing.
///
/// The pupil falls back to the coarse estimate itself, the iris to the coarse
/// center with the radius scaled by `iris_fallback_ratio`.
pub fn fit_circles(
    edge_map: &EdgeMap,
    estimate: &PupilEstimate,
    config: &LocalizationConfig,
) -> Result<(CircleFit, CircleFit), ImageError> {
    let (pupil_band, iris_band) = radius_bands(estimate.radius, config);
    let (x, y) = estimate.center;

    let fit_or_fallback = |band: (u32, u32), fallback_radius: u32| -> Result<CircleFit, ImageError> {
        let fit = match fit_boundary(edge_map, estimate, band, config)? {
            Some(circle) => CircleFit {
                circle,
                source: CircleSource::Hough,
            },
            None => {
                log::warn!(
                    "no circle found in radius band {:?}, using radius {} at {:?}",
                    band,
                    fallback_radius,
                    estimate.center
                );
                CircleFit {
                    circle: Circle::new(x, y, fallback_radius),
                    source: CircleSource::Fallback,
                }
            }
        };
        Ok(fit)
    };

    let iris_fallback = (config.iris_fallback_ratio * estimate.radius as f64).round() as u32;
    let pupil = fit_or_fallback(pupil_band, estimate.radius)?;
    let iris = fit_or_fallback(iris_band, iris_fallback)?;

    Ok((pupil, iris))
}
