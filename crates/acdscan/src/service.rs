//! Service boundary: health probe and encoded-image analysis.
//!
//! Responses follow the JSON contract consumed by clients: a flat object with
//! `success: true` and the analysis sections, or `success: false` with a
//! message and a stable reason code.

use image::RgbImage;

use crate::api::EyeAnalyzer;
use crate::error::AnalyzeError;
use crate::landmarks::{EyeSide, LandmarkSource};
use crate::pipeline::AnalysisResult;

/// Readiness probe payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HealthStatus {
    /// Always `"ready"` once the service answers.
    pub status: String,
    /// Whether the landmark model finished initializing.
    pub model_initialized: bool,
}

/// Response envelope of one analysis request.
///
/// Serializes with a `success` flag derived from the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeResponse {
    /// Analysis completed with iris, pupil, features and prediction sections.
    Success(Box<AnalysisResult>),
    /// Analysis ended without a prediction.
    Failure {
        /// Human-readable message.
        error: String,
        /// Stable reason code, see [`AnalyzeError::code`].
        reason: String,
    },
}

#[derive(serde::Serialize)]
struct SuccessEnvelope<'a> {
    success: bool,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

#[derive(serde::Serialize)]
struct FailureEnvelope<'a> {
    success: bool,
    error: &'a str,
    reason: &'a str,
}

impl serde::Serialize for AnalyzeResponse {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(result) => SuccessEnvelope {
                success: true,
                result,
            }
            .serialize(serializer),
            Self::Failure { error, reason } => FailureEnvelope {
                success: false,
                error,
                reason,
            }
            .serialize(serializer),
        }
    }
}

impl AnalyzeResponse {
    /// Wrap a pipeline outcome.
    pub fn from_result(result: Result<AnalysisResult, AnalyzeError>) -> Self {
        match result {
            Ok(result) => Self::Success(Box::new(result)),
            Err(err) => Self::Failure {
                error: err.to_string(),
                reason: err.code().to_string(),
            },
        }
    }

    /// Whether this is a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Analysis result, if any.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Success(result) => Some(result.as_ref()),
            Self::Failure { .. } => None,
        }
    }
}

/// Decode PNG/JPEG bytes into an RGB image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, AnalyzeError> {
    if bytes.is_empty() {
        return Err(AnalyzeError::InvalidImage {
            reason: "empty payload".to_string(),
        });
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| AnalyzeError::InvalidImage {
        reason: e.to_string(),
    })?;
    Ok(decoded.to_rgb8())
}

/// Analyzer bound to a landmark source, answering service requests.
///
/// The source is used through `&mut self`, so a service instance handles
/// one request at a time; run one instance per worker for throughput.
pub struct AnalyzeService<S> {
    analyzer: EyeAnalyzer,
    source: S,
}

impl<S: LandmarkSource> AnalyzeService<S> {
    /// Bind `analyzer` to `source`.
    pub fn new(analyzer: EyeAnalyzer, source: S) -> Self {
        Self { analyzer, source }
    }

    /// Analyzer used for every request.
    pub fn analyzer(&self) -> &EyeAnalyzer {
        &self.analyzer
    }

    /// Readiness probe.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ready".to_string(),
            model_initialized: self.source.is_ready(),
        }
    }

    /// Analyze an already decoded image.
    pub fn analyze_image(&mut self, image: &RgbImage, eye: EyeSide) -> AnalyzeResponse {
        let outcome = self
            .analyzer
            .analyze_with_source(image, &mut self.source, eye);
        if let Err(err) = &outcome {
            tracing::warn!(reason = err.code(), eye = eye.as_str(), "analysis failed: {}", err);
        }
        AnalyzeResponse::from_result(outcome)
    }

    /// Decode `bytes` and analyze the requested eye.
    pub fn analyze_encoded(&mut self, bytes: &[u8], eye: EyeSide) -> AnalyzeResponse {
        match decode_image(bytes) {
            Ok(image) => self.analyze_image(&image, eye),
            Err(err) => {
                tracing::warn!(reason = err.code(), "rejected payload: {}", err);
                AnalyzeResponse::from_result(Err(err))
            }
        }
    }
}
