use iriscode_image::Image;
use iriscode_imgproc::filter::kernels::{gabor_kernel, GaborParams};

use crate::{config::GaborBankConfig, error::FeatureError};

/// An ordered set of normalized real Gabor kernels, one per orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterBank {
    kernels: Vec<Image<f32, 1>>,
    thetas: Vec<f64>,
}

impl FilterBank {
    /// Build the bank described by `config`.
    ///
    /// Orientation `i` is `i * pi / num_orientations`. Every kernel is divided by
    /// `normalization` times its own sum.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidBankConfig`] for an empty bank, an even or
    /// zero kernel size, or a kernel whose sum cannot be normalized.
    ///
    /// # Examples
    ///
    /// ```
    /// use iriscode_features::{FilterBank, GaborBankConfig};
    ///
    /// let bank = FilterBank::new(&GaborBankConfig::default()).unwrap();
    /// assert_eq!(bank.len(), 16);
    ///
    /// let sum: f32 = bank.kernels()[0].as_slice().iter().sum();
    /// assert!((sum - 1.0 / 1.5).abs() < 1e-5);
    /// ```
    pub fn new(config: &GaborBankConfig) -> Result<Self, FeatureError> {
        if config.num_orientations == 0 {
            return Err(FeatureError::InvalidBankConfig(
                "the bank needs at least one orientation".to_string(),
            ));
        }
        if config.kernel_size == 0 || config.kernel_size % 2 == 0 {
            return Err(FeatureError::InvalidBankConfig(format!(
                "kernel size {} must be odd",
                config.kernel_size
            )));
        }

        let step = std::f64::consts::PI / config.num_orientations as f64;
        let thetas = (0..config.num_orientations)
            .map(|i| i as f64 * step)
            .collect::<Vec<_>>();

        let kernels = thetas
            .iter()
            .map(|&theta| {
                let mut kernel = gabor_kernel(&GaborParams {
                    kernel_size: config.kernel_size,
                    sigma: config.sigma,
                    theta,
                    lambda: config.lambda,
                    gamma: config.gamma,
                    psi: config.psi,
                })?;

                let sum = kernel.as_slice().iter().map(|&v| v as f64).sum::<f64>();
                let scale = config.normalization * sum;
                if scale == 0.0 || !scale.is_finite() {
                    return Err(FeatureError::InvalidBankConfig(format!(
                        "kernel at theta {theta} cannot be normalized"
                    )));
                }

                let scale = scale as f32;
                kernel.as_slice_mut().iter_mut().for_each(|v| *v /= scale);
                Ok(kernel)
            })
            .collect::<Result<Vec<_>, FeatureError>>()?;

        log::debug!(
            "built a bank of {} {}x{} gabor kernels",
            kernels.len(),
            config.kernel_size,
            config.kernel_size
        );

        Ok(Self { kernels, thetas })
    }

    /// Build a bank from existing kernels, in the given order.
    ///
    /// Orientations are unknown and reported as `NaN`.
    pub fn from_kernels(kernels: Vec<Image<f32, 1>>) -> Self {
        let thetas = vec![f64::NAN; kernels.len()];
        Self { kernels, thetas }
    }

    /// The kernels, in bank order.
    pub fn kernels(&self) -> &[Image<f32, 1>] {
        &self.kernels
    }

    /// The orientation of each kernel, in radians.
    pub fn thetas(&self) -> &[f64] {
        &self.thetas
    }

    /// Number of kernels.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Whether the bank holds no kernel.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bank_orientations() -> Result<(), FeatureError> {
        let bank = FilterBank::new(&GaborBankConfig {
            num_orientations: 4,
            ..Default::default()
        })?;
        assert_eq!(bank.len(), 4);
        assert_relative_eq!(bank.thetas()[1], std::f64::consts::FRAC_PI_4);
        assert_relative_eq!(bank.thetas()[3], 3.0 * std::f64::consts::FRAC_PI_4);

        for kernel in bank.kernels() {
            assert_eq!(kernel.width(), 31);
            assert_eq!(kernel.height(), 31);
            let sum = kernel.as_slice().iter().map(|&v| v as f64).sum::<f64>();
            assert_relative_eq!(sum, 1.0 / 1.5, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_bank_normalized_center() -> Result<(), FeatureError> {
        let bank = FilterBank::new(&GaborBankConfig::default())?;
        // 1 / (1.5 * 8.10675763)
        assert_relative_eq!(bank.kernels()[0].get_pixel(15, 15, 0)?, 0.0822359, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_bank_invalid_config() {
        let empty = GaborBankConfig {
            num_orientations: 0,
            ..Default::default()
        };
        assert!(matches!(
            FilterBank::new(&empty),
            Err(FeatureError::InvalidBankConfig(_))
        ));

        let even = GaborBankConfig {
            kernel_size: 30,
            ..Default::default()
        };
        assert!(matches!(
            FilterBank::new(&even),
            Err(FeatureError::InvalidBankConfig(_))
        ));
    }
}
