#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod bank;
pub use bank::FilterBank;

mod blocks;
pub use blocks::{block_features, feature_len, kept_rows};

mod config;
pub use config::{BlockStatsConfig, FeatureConfig, GaborBankConfig};

mod error;
pub use error::FeatureError;

mod extractor;
pub use extractor::FeatureExtractor;

mod response;
pub use response::max_response;
