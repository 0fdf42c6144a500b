use argh::FromArgs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use iriscode::{
    features::{FeatureConfig, FeatureExtractor},
    image::{Image, ImageSize},
    localization::{CircleSet, CircleSource, IrisLocalizer, LocalizationConfig, PupilEstimate},
};

#[derive(FromArgs)]
/// Localize the iris of a synthetic eye and print its texture features as JSON
struct Args {
    /// path to a JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// width of the synthetic image
    #[argh(option, default = "320")]
    width: usize,

    /// height of the synthetic image
    #[argh(option, default = "280")]
    height: usize,

    /// radius of the pupil disk
    #[argh(option, default = "40")]
    pupil_radius: usize,

    /// radius of the iris disk
    #[argh(option, default = "100")]
    iris_radius: usize,

    /// number of feature values to print
    #[argh(option, default = "8")]
    head: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    localization: LocalizationConfig,
    features: FeatureConfig,
}

#[derive(Serialize)]
struct Report {
    pupil_estimate: PupilEstimate,
    circles: CircleSet,
    pupil_source: CircleSource,
    iris_source: CircleSource,
    feature_len: usize,
    features_head: Vec<f64>,
}

/// Dark pupil inside a mid-gray iris on a bright background, centered in the image.
fn synthetic_eye(
    size: ImageSize,
    pupil_radius: usize,
    iris_radius: usize,
) -> Result<Image<u8, 1>, Box<dyn std::error::Error>> {
    let (cx, cy) = ((size.width / 2) as i64, (size.height / 2) as i64);
    let (rp, ri) = (pupil_radius as i64, iris_radius as i64);
    let image = Image::from_fn(size, |x, y| {
        let d_sq = (x as i64 - cx).pow(2) + (y as i64 - cy).pow(2);
        if d_sq <= rp * rp {
            20
        } else if d_sq <= ri * ri {
            120
        } else {
            200
        }
    })?;
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => serde_json::from_str::<DemoConfig>(&std::fs::read_to_string(path)?)?,
        None => DemoConfig::default(),
    };
    log::debug!("using config {:?}", config);

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let eye = synthetic_eye(size, args.pupil_radius, args.iris_radius)?;

    let localization = IrisLocalizer::new(config.localization).localize(&eye)?;
    log::info!(
        "pupil {:?}, iris {:?}",
        localization.circles.pupil,
        localization.circles.iris
    );

    let extractor = FeatureExtractor::new(&config.features)?;
    let features = extractor.extract(&localization.segmented)?;

    let report = Report {
        pupil_estimate: localization.pupil_estimate,
        circles: localization.circles,
        pupil_source: localization.pupil_source,
        iris_source: localization.iris_source,
        feature_len: features.len(),
        features_head: features.iter().take(args.head).copied().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
