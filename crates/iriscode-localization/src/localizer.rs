use iriscode_image::Image;

use crate::{
    boundary::{fit_circles, masked_edges},
    circle::{CircleSet, CircleSource, PupilEstimate},
    config::LocalizationConfig,
    error::LocalizationError,
    pupil::{
        binarize, dark_projections, estimate_pupil_radius, grow_pupil_window, refine_centroid,
        seed_from_projections,
    },
    segment::segment_iris,
};

/// Result of localizing the boundaries of one eye image.
#[derive(Clone, Debug, PartialEq)]
pub struct Localization {
    /// The input with the pupil and everything beyond the iris set to 0.
    pub segmented: Image<u8, 1>,
    /// Pupil and iris boundary circles.
    pub circles: CircleSet,
    /// Coarse pupil estimate the circle search started from.
    pub pupil_estimate: PupilEstimate,
    /// How the pupil circle was obtained.
    pub pupil_source: CircleSource,
    /// How the iris circle was obtained.
    pub iris_source: CircleSource,
}

/// Locates the pupil and iris boundaries of grayscale eye images.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_localization::{IrisLocalizer, LocalizationError};
///
/// let localizer = IrisLocalizer::default();
/// let white = Image::<u8, 1>::from_size_val(ImageSize { width: 64, height: 48 }, 255).unwrap();
///
/// assert_eq!(localizer.localize(&white).unwrap_err(), LocalizationError::NoDarkPixels);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IrisLocalizer {
    config: LocalizationConfig,
}

impl IrisLocalizer {
    /// Create a localizer with the given configuration.
    pub fn new(config: LocalizationConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }

    /// Estimate the pupil center and radius from the dark blob of the image.
    pub fn estimate_pupil(&self, image: &Image<u8, 1>) -> Result<PupilEstimate, LocalizationError> {
        let config = &self.config;
        let binary = binarize(image, config.dark_threshold)?;

        let seed = seed_from_projections(&dark_projections(&binary))?;
        log::debug!("pupil seed at {:?}", seed);

        let window = grow_pupil_window(
            &binary,
            seed,
            config.initial_half_extent,
            config.growth_step,
        )?;
        log::debug!("pupil window {:?}", window);

        let center = refine_centroid(&binary, &window, seed, config.median_kernel_size)?;
        let radius = estimate_pupil_radius(&binary, &window, center)?;
        log::debug!("pupil centroid at {:?}, radius {}", center, radius);

        Ok(PupilEstimate {
            center: (center.0 as u32, center.1 as u32),
            radius,
        })
    }

    /// Locate the pupil and iris boundaries and segment the iris.
    ///
    /// # Errors
    ///
    /// * [`LocalizationError::NoDarkPixels`] if the image has no pixel at or
    ///   below the dark threshold.
    /// * [`LocalizationError::PupilRadiusUnresolved`] if the dark run through
    ///   the pupil centroid cannot be measured.
    pub fn localize(&self, image: &Image<u8, 1>) -> Result<Localization, LocalizationError> {
        let pupil_estimate = self.estimate_pupil(image)?;

        let edge_map = masked_edges(image, &pupil_estimate, &self.config)?;
        let (pupil, iris) = fit_circles(&edge_map, &pupil_estimate, &self.config)?;

        let circles = CircleSet {
            pupil: pupil.circle,
            iris: iris.circle,
        };
        log::debug!("boundaries: pupil {:?}, iris {:?}", circles.pupil, circles.iris);

        Ok(Localization {
            segmented: segment_iris(image, &circles),
            circles,
            pupil_estimate,
            pupil_source: pupil.source,
            iris_source: iris.source,
        })
    }
}
