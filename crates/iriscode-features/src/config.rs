use serde::{Deserialize, Serialize};

/// Parameters of the oriented Gabor filter bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaborBankConfig {
    /// Number of orientations, sampled uniformly from `[0, pi)`.
    pub num_orientations: usize,
    /// Width and height of each kernel, odd.
    pub kernel_size: usize,
    /// Standard deviation of the gaussian envelope.
    pub sigma: f64,
    /// Wavelength of the sinusoidal carrier, in pixels.
    pub lambda: f64,
    /// Spatial aspect ratio of the envelope.
    pub gamma: f64,
    /// Phase offset of the carrier, in radians.
    pub psi: f64,
    /// Each kernel is divided by `normalization * sum(kernel)`.
    pub normalization: f64,
}

impl Default for GaborBankConfig {
    fn default() -> Self {
        Self {
            num_orientations: 16,
            kernel_size: 31,
            sigma: 4.0,
            lambda: 10.0,
            gamma: 0.5,
            psi: 0.0,
            normalization: 1.5,
        }
    }
}

/// Layout of the block statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStatsConfig {
    /// Numerator of the fraction of rows kept from the top of the response.
    pub kept_rows_numerator: usize,
    /// Denominator of the fraction of rows kept from the top of the response.
    pub kept_rows_denominator: usize,
    /// Side of the square blocks, in pixels.
    pub block_size: usize,
}

impl Default for BlockStatsConfig {
    fn default() -> Self {
        Self {
            kept_rows_numerator: 3,
            kept_rows_denominator: 4,
            block_size: 8,
        }
    }
}

/// Configuration of the feature extraction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Filter bank parameters.
    pub bank: GaborBankConfig,
    /// Block statistics layout.
    pub blocks: BlockStatsConfig,
}
