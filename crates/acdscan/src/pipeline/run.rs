//! Stage orchestrator: landmarks → iris → pupil → features → classify.

use image::RgbImage;

use super::AnalysisResult;
use crate::classify::classify;
use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::features::extract_features;
use crate::iris::resolve_iris;
use crate::landmarks::{EyeSide, LandmarkSet, LandmarkSource};
use crate::pupil::localize_pupil;

/// Progress of one analysis call, used for stage logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    LandmarksResolved,
    IrisResolved,
    PupilLocalized,
    FeaturesExtracted,
    Classified,
}

impl Stage {
    const fn as_str(self) -> &'static str {
        match self {
            Self::LandmarksResolved => "landmarks_resolved",
            Self::IrisResolved => "iris_resolved",
            Self::PupilLocalized => "pupil_localized",
            Self::FeaturesExtracted => "features_extracted",
            Self::Classified => "classified",
        }
    }
}

fn check_image(image: &RgbImage) -> Result<(), AnalyzeError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(AnalyzeError::InvalidImage {
            reason: format!("empty image ({}x{})", w, h),
        });
    }
    Ok(())
}

fn run(
    image: &RgbImage,
    landmarks: &LandmarkSet,
    config: &AnalyzeConfig,
) -> Result<AnalysisResult, AnalyzeError> {
    let (w, h) = image.dimensions();

    let iris = resolve_iris(landmarks, w, h, &config.iris)?;
    tracing::debug!(
        stage = Stage::IrisResolved.as_str(),
        center_x = iris.center[0],
        center_y = iris.center[1],
        radius = iris.radius
    );

    let pupil = localize_pupil(image, &iris, &config.pupil);
    tracing::debug!(
        stage = Stage::PupilLocalized.as_str(),
        method = pupil.method.as_str(),
        radius = pupil.radius
    );

    let features = extract_features(&iris, &pupil);
    tracing::debug!(
        stage = Stage::FeaturesExtracted.as_str(),
        ratio = features.iris_pupil_ratio,
        eccentricity = features.pupil_eccentricity,
        size = features.normalized_pupil_size
    );

    let prediction = classify(&features, pupil.method);
    tracing::debug!(stage = Stage::Classified.as_str());
    tracing::info!(
        risk_level = prediction.risk_level.as_str(),
        risk_score = prediction.risk_score,
        acd_mm = prediction.acd_mm,
        method = pupil.method.as_str(),
        "eye analyzed"
    );

    Ok(AnalysisResult {
        iris,
        pupil,
        features,
        prediction,
    })
}

/// Analyze with landmarks supplied by the caller.
pub(crate) fn analyze_landmarks(
    image: &RgbImage,
    landmarks: &LandmarkSet,
    eye: EyeSide,
    config: &AnalyzeConfig,
) -> Result<AnalysisResult, AnalyzeError> {
    check_image(image)?;
    tracing::debug!(
        stage = Stage::LandmarksResolved.as_str(),
        eye = eye.as_str(),
        source = "caller"
    );
    run(image, landmarks, config)
}

/// Analyze with landmarks obtained from `source` for the requested eye.
pub(crate) fn analyze_with_source<S>(
    image: &RgbImage,
    source: &mut S,
    eye: EyeSide,
    config: &AnalyzeConfig,
) -> Result<AnalysisResult, AnalyzeError>
where
    S: LandmarkSource + ?Sized,
{
    check_image(image)?;
    let landmarks = source
        .resolve(image, eye)
        .ok_or(AnalyzeError::NoFaceDetected)?;
    tracing::debug!(stage = Stage::LandmarksResolved.as_str(), eye = eye.as_str());
    run(image, &landmarks, config)
}
