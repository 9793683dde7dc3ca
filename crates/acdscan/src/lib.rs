//! acdscan — anterior-chamber depth risk estimation from a single eye image.
//!
//! The crate turns five iris landmarks plus the source image into a risk
//! classification. The pipeline stages are:
//!
//! 1. **Iris** – pixel-space iris center and radius from the landmarks.
//! 2. **Pupil** – dark-region segmentation, contour scoring and a minimum
//!    enclosing circle fit, with a deterministic geometric fallback.
//! 3. **Features** – pupil/iris diameter ratio, pupil eccentricity and
//!    normalized pupil size.
//! 4. **Classify** – fixed threshold tables map the features to a risk
//!    score, an ACD estimate, a risk level and a confidence.
//!
//! The landmark model itself is not part of the crate; it plugs in through
//! [`LandmarkSource`].
//!
//! # Public API
//! - [`EyeAnalyzer`] as the primary entry point
//! - [`AnalyzeConfig`] for tuning
//! - [`AnalyzeService`] and [`decode_image`] for the request/response boundary
//! - result structures, all serde-serializable

mod api;
mod classify;
mod config;
mod error;
mod features;
mod iris;
mod landmarks;
mod pipeline;
mod pupil;
mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::EyeAnalyzer;
pub use classify::{
    acd_for_score, classify, feature_points, DetectionQuality, Prediction, RiskLevel,
    ACD_BY_SCORE, ECCENTRICITY_POINTS, FALLBACK_PENALTY, NORMAL_ACD_MM, RATIO_POINTS,
    SIZE_POINTS,
};
pub use config::{AnalyzeConfig, IrisConfig, PupilConfig};
pub use error::AnalyzeError;
pub use features::{extract_features, FeatureVector, FEATURE_NAMES};
pub use iris::{resolve_iris, IrisObservation};
pub use landmarks::{EyeSide, FixedLandmarks, LandmarkSet, LandmarkSource, IRIS_LANDMARK_COUNT};
pub use pipeline::AnalysisResult;
pub use pupil::{localize_pupil, FallbackReason, PupilMethod, PupilObservation};
pub use service::{decode_image, AnalyzeResponse, AnalyzeService, HealthStatus};
