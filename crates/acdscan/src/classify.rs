//! Deterministic risk scoring of the feature vector.
//!
//! Each feature contributes points from a fixed threshold table; the total
//! maps to an ACD estimate and a risk level. Tables are checked in order and
//! the first matching row wins.

use crate::features::{round_to, FeatureVector, FEATURE_NAMES};
use crate::pupil::PupilMethod;

/// `(upper bound, points)`: ratio strictly below the bound scores the points.
pub const RATIO_POINTS: [(f64, u32); 5] = [(0.16, 5), (0.18, 4), (0.20, 3), (0.22, 2), (0.24, 1)];

/// `(lower bound, points)`: eccentricity strictly above the bound scores the points.
pub const ECCENTRICITY_POINTS: [(f64, u32); 4] = [(0.40, 5), (0.35, 4), (0.30, 3), (0.27, 2)];

/// `(upper bound, points)`: normalized size strictly below the bound scores the points.
pub const SIZE_POINTS: [(f64, u32); 3] = [(0.04, 3), (0.06, 2), (0.08, 1)];

/// Points removed from the total when the pupil came from the fallback.
pub const FALLBACK_PENALTY: u32 = 2;

/// `(minimum score, ACD mm)`; scores below every row map to [`NORMAL_ACD_MM`].
pub const ACD_BY_SCORE: [(u32, f64); 5] = [(10, 1.8), (8, 2.1), (6, 2.4), (4, 2.7), (2, 3.0)];

/// ACD estimate for a score below every row of [`ACD_BY_SCORE`].
pub const NORMAL_ACD_MM: f64 = 3.3;

const BASE_CONFIDENCE: f64 = 0.80;
const CONFIDENCE_RANGE: [f64; 2] = [0.50, 0.95];

const FALLBACK_NOTE: &str = "\n\n⚠️ NOTE: Pupil detection used estimation. \
For better accuracy:\n\
• Ensure good lighting\n\
• Eye wide open\n\
• Clear pupil visibility";

/// Angle-closure risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Normal chamber depth.
    Low,
    /// Borderline shallow chamber.
    Moderate,
    /// Shallow chamber.
    High,
}

impl RiskLevel {
    /// Level for an ACD estimate: below 2.4 mm is high, below 2.7 mm moderate.
    pub fn from_acd(acd_mm: f64) -> Self {
        if acd_mm < 2.4 {
            Self::High
        } else if acd_mm < 2.7 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Wire name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }

    fn recommendation(self, acd_mm: f64) -> String {
        match self {
            Self::High => format!(
                "HIGH RISK detected (ACD: {acd_mm:.1} mm - shallow anterior chamber).\n\n\
                 IMMEDIATE ACTION REQUIRED:\n\
                 • Schedule URGENT ophthalmology consultation within 24-48 hours\n\
                 • Risk of angle-closure glaucoma attack\n\
                 • Avoid medications that dilate pupils\n\
                 • Seek emergency care if experiencing eye pain or vision changes"
            ),
            Self::Moderate => format!(
                "MODERATE RISK (ACD: {acd_mm:.1} mm - borderline shallow chamber).\n\n\
                 RECOMMENDED ACTIONS:\n\
                 • Schedule comprehensive eye exam within 1-2 weeks\n\
                 • Request gonioscopy for angle assessment\n\
                 • Monitor for symptoms: eye pain, halos, headaches\n\
                 • Regular IOP monitoring recommended"
            ),
            Self::Low => format!(
                "LOW RISK (ACD: {acd_mm:.1} mm - normal anterior chamber depth).\n\n\
                 MAINTENANCE:\n\
                 • Continue routine comprehensive eye exams annually\n\
                 • Monitor IOP regularly (every 6-12 months)\n\
                 • Maintain healthy lifestyle (exercise, diet)\n\
                 • Report any vision changes to eye care professional"
            ),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reliability of the pupil measurement behind a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DetectionQuality {
    /// Pupil was segmented.
    Good,
    /// Pupil came from the geometric fallback.
    Estimated,
}

impl From<PupilMethod> for DetectionQuality {
    fn from(method: PupilMethod) -> Self {
        match method {
            PupilMethod::Segmented => Self::Good,
            PupilMethod::Fallback => Self::Estimated,
        }
    }
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Prediction {
    /// Estimated anterior chamber depth (mm, 1 decimal).
    pub acd_mm: f64,
    /// Risk category derived from `acd_mm`.
    pub risk_level: RiskLevel,
    /// Total points after the fallback penalty.
    pub risk_score: u32,
    /// Confidence in `[0.50, 0.95]` (2 decimals).
    pub confidence: f64,
    /// Human-readable advice for the risk level.
    pub recommendation: String,
    /// `Good` for segmented pupils, `Estimated` for fallback.
    pub detection_quality: DetectionQuality,
    /// Names of the scored features.
    pub features_used: Vec<String>,
}

fn points_below(value: f64, table: &[(f64, u32)]) -> u32 {
    table
        .iter()
        .find(|(bound, _)| value < *bound)
        .map_or(0, |&(_, points)| points)
}

fn points_above(value: f64, table: &[(f64, u32)]) -> u32 {
    table
        .iter()
        .find(|(bound, _)| value > *bound)
        .map_or(0, |&(_, points)| points)
}

/// Raw feature points, before the fallback penalty.
pub fn feature_points(features: &FeatureVector) -> [u32; 3] {
    [
        points_below(features.iris_pupil_ratio, &RATIO_POINTS),
        points_above(features.pupil_eccentricity, &ECCENTRICITY_POINTS),
        points_below(features.normalized_pupil_size, &SIZE_POINTS),
    ]
}

/// ACD estimate for a risk score.
pub fn acd_for_score(score: u32) -> f64 {
    ACD_BY_SCORE
        .iter()
        .find(|(min_score, _)| score >= *min_score)
        .map_or(NORMAL_ACD_MM, |&(_, acd)| acd)
}

fn confidence(features: &FeatureVector, fallback: bool) -> f64 {
    let ratio = features.iris_pupil_ratio;
    let ecc = features.pupil_eccentricity;
    let size = features.normalized_pupil_size;

    let mut c = BASE_CONFIDENCE;
    if ratio > 0.24 && ratio < 0.50 {
        c += 0.10;
    }
    if ecc < 0.30 {
        c += 0.08;
    }
    if size > 0.08 && size < 0.25 {
        c += 0.07;
    }
    if ratio < 0.15 || ratio > 0.60 {
        c -= 0.10;
    }
    if ecc > 0.50 {
        c -= 0.08;
    }
    if fallback {
        c -= 0.15;
    }
    round_to(c.clamp(CONFIDENCE_RANGE[0], CONFIDENCE_RANGE[1]), 2)
}

/// Score `features` and map the result to an ACD estimate and risk level.
pub fn classify(features: &FeatureVector, method: PupilMethod) -> Prediction {
    let fallback = method == PupilMethod::Fallback;
    let raw: u32 = feature_points(features).iter().sum();
    let risk_score = if fallback {
        raw.saturating_sub(FALLBACK_PENALTY)
    } else {
        raw
    };

    let acd_mm = round_to(acd_for_score(risk_score), 1);
    let risk_level = RiskLevel::from_acd(acd_mm);
    let mut recommendation = risk_level.recommendation(acd_mm);
    if fallback {
        recommendation.push_str(FALLBACK_NOTE);
    }

    Prediction {
        acd_mm,
        risk_level,
        risk_score,
        confidence: confidence(features, fallback),
        recommendation,
        detection_quality: method.into(),
        features_used: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    }
}
