use iriscode_image::{Image, ImageError, ImageSize};

/// Smoothing tables used for small kernels when no sigma is given.
const SMALL_GAUSSIAN_TABLES: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Sigma implied by a gaussian kernel size.
///
/// Used whenever a gaussian kernel is requested with a non-positive sigma.
pub fn gaussian_sigma_from_size(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel. When `sigma <= 0` it is derived
///   from the kernel size; odd sizes up to 7 then use fixed smoothing tables.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 && kernel_size % 2 == 1 && kernel_size <= 7 {
        return SMALL_GAUSSIAN_TABLES[kernel_size / 2].to_vec();
    }

    let sigma = if sigma <= 0.0 {
        gaussian_sigma_from_size(kernel_size)
    } else {
        sigma
    };

    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size as f32 - 1.0) / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the 3x3 Sobel kernels `(kernel_x, kernel_y)`, unnormalized.
pub fn sobel_kernel_3x3() -> ([[f32; 3]; 3], [[f32; 3]; 3]) {
    let kernel_x = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    let kernel_y = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
    (kernel_x, kernel_y)
}

/// Parameters of a real Gabor kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaborParams {
    /// Width and height of the kernel, odd.
    pub kernel_size: usize,
    /// Standard deviation of the gaussian envelope.
    pub sigma: f64,
    /// Orientation of the carrier normal, in radians.
    pub theta: f64,
    /// Wavelength of the sinusoidal carrier, in pixels.
    pub lambda: f64,
    /// Spatial aspect ratio of the envelope.
    pub gamma: f64,
    /// Phase offset of the carrier, in radians.
    pub psi: f64,
}

/// Create a real Gabor kernel.
///
/// The kernel value for the offsets `x, y` in `[-size/2, size/2]` is
/// `exp(-xr²/2σx² - yr²/2σy²) · cos(2π·xr/λ + ψ)` with
/// `xr = x·cosθ + y·sinθ`, `yr = -x·sinθ + y·cosθ`, `σx = σ`, `σy = σ/γ`,
/// evaluated in double precision and stored at `(size/2 - y, size/2 - x)`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelSize`] for an even or zero kernel size.
///
/// # Examples
///
/// ```
/// use iriscode_imgproc::filter::kernels::{gabor_kernel, GaborParams};
///
/// let kernel = gabor_kernel(&GaborParams {
///     kernel_size: 31,
///     sigma: 4.0,
///     theta: 0.0,
///     lambda: 10.0,
///     gamma: 0.5,
///     psi: 0.0,
/// }).unwrap();
///
/// assert_eq!(kernel.width(), 31);
/// assert_eq!(kernel.get([15, 15, 0]), Some(&1.0));
/// ```
pub fn gabor_kernel(params: &GaborParams) -> Result<Image<f32, 1>, ImageError> {
    let size = params.kernel_size;
    if size == 0 || size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(size));
    }

    let half = (size / 2) as i64;
    let sigma_x = params.sigma;
    let sigma_y = params.sigma / params.gamma;
    let (s, c) = params.theta.sin_cos();
    let ex = -0.5 / (sigma_x * sigma_x);
    let ey = -0.5 / (sigma_y * sigma_y);
    let cscale = std::f64::consts::PI * 2.0 / params.lambda;

    let mut data = vec![0.0f32; size * size];
    for y in -half..=half {
        for x in -half..=half {
            let xr = x as f64 * c + y as f64 * s;
            let yr = -(x as f64) * s + y as f64 * c;
            let v = (ex * xr * xr + ey * yr * yr).exp() * (cscale * xr + params.psi).cos();
            let row = (half - y) as usize;
            let col = (half - x) as usize;
            data[row * size + col] = v as f32;
        }
    }

    Image::new(
        ImageSize {
            width: size,
            height: size,
        },
        data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (i, &k) in kernel.iter().enumerate() {
            assert_relative_eq!(k, expected[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gaussian_kernel_1d_default_sigma() {
        assert_eq!(
            gaussian_kernel_1d(5, 0.0),
            vec![0.0625, 0.25, 0.375, 0.25, 0.0625]
        );

        let kernel = gaussian_kernel_1d(9, 0.0);
        assert_eq!(kernel.len(), 9);
        assert_relative_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(gaussian_sigma_from_size(9), 1.7, epsilon = 1e-6);
    }

    #[test]
    fn test_sobel_kernel_3x3() {
        let (kx, ky) = sobel_kernel_3x3();
        assert_eq!(kx[1], [-2.0, 0.0, 2.0]);
        assert_eq!(ky[2], [1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_gabor_kernel_golden() -> Result<(), ImageError> {
        let params = GaborParams {
            kernel_size: 31,
            sigma: 4.0,
            theta: 0.0,
            lambda: 10.0,
            gamma: 0.5,
            psi: 0.0,
        };
        let kernel = gabor_kernel(&params)?;

        assert_eq!(kernel.size(), ImageSize { width: 31, height: 31 });
        assert_relative_eq!(kernel.get_pixel(15, 15, 0)?, 1.0);
        assert_relative_eq!(kernel.get_pixel(16, 15, 0)?, 0.78412616, epsilon = 1e-6);
        assert_relative_eq!(kernel.get_pixel(15, 16, 0)?, 0.99221796, epsilon = 1e-6);
        assert_relative_eq!(kernel.get_pixel(20, 10, 0)?, -0.37660345, epsilon = 1e-6);

        let sum = kernel.as_slice().iter().map(|&v| v as f64).sum::<f64>();
        assert_relative_eq!(sum, 8.10675763, epsilon = 1e-5);

        Ok(())
    }

    #[test]
    fn test_gabor_kernel_orientation() -> Result<(), ImageError> {
        let base = GaborParams {
            kernel_size: 31,
            sigma: 4.0,
            theta: 0.0,
            lambda: 10.0,
            gamma: 0.5,
            psi: 0.0,
        };
        let horizontal = gabor_kernel(&base)?;
        let vertical = gabor_kernel(&GaborParams {
            theta: std::f64::consts::FRAC_PI_2,
            ..base
        })?;

        // rotating by 90 degrees transposes the kernel
        for y in 0..31 {
            for x in 0..31 {
                assert_relative_eq!(
                    horizontal.get_pixel(x, y, 0)?,
                    vertical.get_pixel(y, x, 0)?,
                    epsilon = 1e-6
                );
            }
        }

        Ok(())
    }

    #[test]
    fn test_gabor_kernel_invalid_size() {
        let params = GaborParams {
            kernel_size: 30,
            sigma: 4.0,
            theta: 0.0,
            lambda: 10.0,
            gamma: 0.5,
            psi: 0.0,
        };
        assert_eq!(
            gabor_kernel(&params).err(),
            Some(ImageError::InvalidKernelSize(30))
        );
    }
}
