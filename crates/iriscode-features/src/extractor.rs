use iriscode_image::Image;

use crate::{
    bank::FilterBank,
    blocks::block_features,
    config::{BlockStatsConfig, FeatureConfig},
    error::FeatureError,
    response::max_response,
};

/// Extracts block texture features, reusing one filter bank across images.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_features::{FeatureConfig, FeatureExtractor};
///
/// let extractor = FeatureExtractor::new(&FeatureConfig::default()).unwrap();
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 16, height: 16 }, 90).unwrap();
/// let features = extractor.extract(&image).unwrap();
///
/// // 12 kept rows and 16 columns: 2 x 2 blocks
/// assert_eq!(features, vec![60.0, 0.0, 60.0, 0.0, 60.0, 0.0, 60.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    bank: FilterBank,
    blocks: BlockStatsConfig,
}

impl FeatureExtractor {
    /// Build the filter bank described by `config`.
    pub fn new(config: &FeatureConfig) -> Result<Self, FeatureError> {
        Ok(Self {
            bank: FilterBank::new(&config.bank)?,
            blocks: config.blocks.clone(),
        })
    }

    /// The filter bank in use.
    pub fn bank(&self) -> &FilterBank {
        &self.bank
    }

    /// Compute the maximum bank response of an enhanced image.
    pub fn response(&self, image: &Image<u8, 1>) -> Result<Image<u8, 1>, FeatureError> {
        max_response(image, &self.bank)
    }

    /// Compute the feature vector of an enhanced image.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::EmptyRegion`] for an image without rows or columns.
    pub fn extract(&self, image: &Image<u8, 1>) -> Result<Vec<f64>, FeatureError> {
        let response = self.response(image)?;
        let features = block_features(&response, &self.blocks)?;
        log::debug!(
            "extracted {} features from a {} image",
            features.len(),
            image.size()
        );
        Ok(features)
    }
}
