use iriscode_image::{Image, ImageSize};
use iriscode_imgproc::core::std_mean_roi;

use crate::{config::BlockStatsConfig, error::FeatureError};

fn validate(config: &BlockStatsConfig) -> Result<(), FeatureError> {
    if config.block_size == 0 {
        return Err(FeatureError::InvalidBankConfig(
            "block size must be positive".to_string(),
        ));
    }
    if config.kept_rows_denominator == 0 || config.kept_rows_numerator > config.kept_rows_denominator
    {
        return Err(FeatureError::InvalidBankConfig(format!(
            "kept row fraction {}/{} must lie in [0, 1]",
            config.kept_rows_numerator, config.kept_rows_denominator
        )));
    }
    Ok(())
}

/// Number of rows kept from the top of an image of `height` rows, rounded up.
pub fn kept_rows(height: usize, config: &BlockStatsConfig) -> usize {
    let den = config.kept_rows_denominator.max(1);
    (height * config.kept_rows_numerator).div_ceil(den)
}

/// Length of the feature vector produced for an image of the given size.
///
/// # Examples
///
/// ```
/// use iriscode_image::ImageSize;
/// use iriscode_features::{feature_len, BlockStatsConfig};
///
/// let size = ImageSize { width: 100, height: 100 };
/// // 75 kept rows: 10 x 13 blocks
/// assert_eq!(feature_len(size, &BlockStatsConfig::default()), 260);
/// ```
pub fn feature_len(size: ImageSize, config: &BlockStatsConfig) -> usize {
    let block = config.block_size.max(1);
    let row_blocks = kept_rows(size.height, config).div_ceil(block);
    let col_blocks = size.width.div_ceil(block);
    2 * row_blocks * col_blocks
}

/// Reduce a response image to interleaved block means and standard deviations.
///
/// The top rows of the image are split into square blocks in row-major order,
/// the last block of each row and column clipped to the image. Each block adds
/// its mean and then its population standard deviation.
///
/// # Errors
///
/// * [`FeatureError::EmptyRegion`] if no row or no column is kept.
/// * [`FeatureError::InvalidBankConfig`] for a zero block size or a kept row
///   fraction outside `[0, 1]`.
pub fn block_features(
    response: &Image<u8, 1>,
    config: &BlockStatsConfig,
) -> Result<Vec<f64>, FeatureError> {
    validate(config)?;

    let width = response.cols();
    let height = kept_rows(response.rows(), config);
    if width == 0 || height == 0 {
        return Err(FeatureError::EmptyRegion { width, height });
    }

    let block = config.block_size;
    let mut features = Vec::with_capacity(feature_len(response.size(), config));

    for y in (0..height).step_by(block) {
        let block_height = block.min(height - y);
        for x in (0..width).step_by(block) {
            let block_width = block.min(width - x);
            let (std, mean) = std_mean_roi(response, x, y, block_width, block_height)?;
            features.push(mean);
            features.push(std);
        }
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kept_rows_rounds_up() {
        let config = BlockStatsConfig::default();
        assert_eq!(kept_rows(100, &config), 75);
        assert_eq!(kept_rows(130, &config), 98);
        assert_eq!(kept_rows(97, &config), 73);
        assert_eq!(kept_rows(1, &config), 1);
        assert_eq!(kept_rows(0, &config), 0);
    }

    #[test]
    fn test_block_features_layout() -> Result<(), FeatureError> {
        // 10 columns: blocks of width 8 and 2; 4 rows keep 3: one block row
        let response = Image::<u8, 1>::from_fn(
            ImageSize {
                width: 10,
                height: 4,
            },
            |x, y| if x < 8 { (10 * y) as u8 } else { 50 },
        )?;
        let features = block_features(&response, &BlockStatsConfig::default())?;

        assert_eq!(features.len(), 4);
        // rows 0, 1, 2 hold 0, 10, 20
        assert_relative_eq!(features[0], 10.0);
        assert_relative_eq!(features[1], (200.0f64 / 3.0).sqrt());
        assert_relative_eq!(features[2], 50.0);
        assert_eq!(features[3], 0.0);
        Ok(())
    }

    #[test]
    fn test_block_features_lengths() -> Result<(), FeatureError> {
        let config = BlockStatsConfig::default();
        for (width, height) in [(100, 100), (97, 130), (130, 97), (8, 8), (9, 1), (1, 3)] {
            let size = ImageSize { width, height };
            let response = Image::<u8, 1>::from_size_val(size, 3)?;
            let features = block_features(&response, &config)?;

            let row_blocks = (3 * height).div_ceil(4).div_ceil(8);
            let col_blocks = width.div_ceil(8);
            assert_eq!(features.len(), 2 * row_blocks * col_blocks);
            assert_eq!(features.len(), feature_len(size, &config));
        }
        assert_eq!(
            feature_len(
                ImageSize {
                    width: 97,
                    height: 130
                },
                &config
            ),
            338
        );
        Ok(())
    }

    #[test]
    fn test_block_features_errors() -> Result<(), FeatureError> {
        let empty = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 0,
                height: 12,
            },
            0,
        )?;
        assert_eq!(
            block_features(&empty, &BlockStatsConfig::default()),
            Err(FeatureError::EmptyRegion {
                width: 0,
                height: 9
            })
        );

        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;
        let zero_block = BlockStatsConfig {
            block_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            block_features(&image, &zero_block),
            Err(FeatureError::InvalidBankConfig(_))
        ));
        Ok(())
    }
}
