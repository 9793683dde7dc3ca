use crate::classify::{Prediction, RiskLevel};
use crate::features::FeatureVector;
use crate::iris::IrisObservation;
use crate::pupil::{PupilMethod, PupilObservation};

/// Full analysis result for one eye.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    /// Iris circle resolved from the landmarks.
    pub iris: IrisObservation,
    /// Segmented or estimated pupil circle.
    pub pupil: PupilObservation,
    /// Biomarkers derived from the two circles.
    pub features: FeatureVector,
    /// Classifier output.
    pub prediction: Prediction,
}

impl AnalysisResult {
    /// Risk level of the prediction.
    pub fn risk_level(&self) -> RiskLevel {
        self.prediction.risk_level
    }

    /// Whether the pupil came from the geometric fallback.
    pub fn used_fallback(&self) -> bool {
        self.pupil.method == PupilMethod::Fallback
    }
}
