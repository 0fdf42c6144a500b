use serde::{Deserialize, Serialize};

/// Thresholds of the Canny edge detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyConfig {
    /// Gradient magnitude above which a pixel may extend an edge.
    pub low_threshold: f32,
    /// Gradient magnitude above which a pixel starts an edge.
    pub high_threshold: f32,
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            low_threshold: 20.0,
            high_threshold: 30.0,
        }
    }
}

/// Edge regions discarded before the circle search, as multiples of the
/// coarse pupil radius.
///
/// Edges at `gap_inner_ratio * r <= d <= gap_outer_ratio * r` (iris texture
/// between the two boundaries) and at `d >= outer_ratio * r` (eyelids and
/// lashes) are removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeMaskConfig {
    /// Inner radius of the removed ring.
    pub gap_inner_ratio: f64,
    /// Outer radius of the removed ring.
    pub gap_outer_ratio: f64,
    /// Radius beyond which every edge is removed.
    pub outer_ratio: f64,
}

impl Default for EdgeMaskConfig {
    fn default() -> Self {
        Self {
            gap_inner_ratio: 1.2,
            gap_outer_ratio: 2.0,
            outer_ratio: 3.2,
        }
    }
}

/// Parameters of the two circle searches.
///
/// There is no edge threshold here: the searches vote on the masked Canny map,
/// whose thresholds are in [`CannyConfig`], using the derivatives of the
/// blurred image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Inverse resolution of the center accumulator.
    pub dp: f32,
    /// Minimum distance between two detected centers.
    pub min_dist: f32,
    /// Votes a center must exceed to be a candidate.
    pub acc_threshold: u32,
    /// Half width of the pupil radius band around the coarse radius.
    pub pupil_band_margin: u32,
    /// Smallest iris radius, as a multiple of the coarse pupil radius.
    pub iris_min_ratio: f64,
    /// Largest iris radius, as a multiple of the coarse pupil radius.
    pub iris_max_ratio: f64,
    /// Maximum per-axis offset between a detected center and the coarse center.
    pub center_tolerance: u32,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            dp: 1.0,
            min_dist: 10.0,
            acc_threshold: 10,
            pupil_band_margin: 15,
            iris_min_ratio: 2.0,
            iris_max_ratio: 4.0,
            center_tolerance: 10,
        }
    }
}

/// Configuration of the boundary localization.
///
/// Every field has a default, so a partial JSON document only overrides the
/// fields it names:
///
/// ```
/// use iriscode_localization::LocalizationConfig;
///
/// let config: LocalizationConfig =
///     serde_json::from_str(r#"{ "dark_threshold": 50, "hough": { "acc_threshold": 20 } }"#).unwrap();
///
/// assert_eq!(config.dark_threshold, 50);
/// assert_eq!(config.hough.acc_threshold, 20);
/// assert_eq!(config.hough.min_dist, 10.0);
/// assert_eq!(config.growth_step, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Binarization threshold, pixels at or below it are dark.
    pub dark_threshold: u8,
    /// Initial half extent of the pupil search window, in pixels, at least 1.
    pub initial_half_extent: usize,
    /// Outward growth of a window edge per iteration, in pixels.
    pub growth_step: usize,
    /// Aperture of the median filter applied to the pupil window.
    pub median_kernel_size: usize,
    /// Size of the gaussian kernel smoothing the image before edge detection.
    pub blur_kernel_size: usize,
    /// Edge detector thresholds.
    pub canny: CannyConfig,
    /// Edge regions removed before the circle search.
    pub edge_mask: EdgeMaskConfig,
    /// Circle search parameters.
    pub hough: HoughConfig,
    /// Iris radius used when the iris search fails, as a multiple of the
    /// coarse pupil radius.
    pub iris_fallback_ratio: f64,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 64,
            initial_half_extent: 60,
            growth_step: 10,
            median_kernel_size: 7,
            blur_kernel_size: 5,
            canny: CannyConfig::default(),
            edge_mask: EdgeMaskConfig::default(),
            hough: HoughConfig::default(),
            iris_fallback_ratio: 2.5,
        }
    }
}
