//! Geometric biomarkers derived from the iris and pupil circles.

use crate::iris::IrisObservation;
use crate::pupil::PupilObservation;

/// Names of the features the classifier scores, in scoring order.
pub const FEATURE_NAMES: [&str; 3] = [
    "iris_pupil_ratio",
    "pupil_eccentricity",
    "normalized_pupil_size",
];

/// Scalar biomarkers of one eye.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureVector {
    /// Pupil diameter over iris diameter (3 decimals).
    pub iris_pupil_ratio: f64,
    /// Pupil center offset in iris radii (3 decimals).
    pub pupil_eccentricity: f64,
    /// `(pupil.radius / iris.radius)²` (3 decimals).
    pub normalized_pupil_size: f64,
    /// Iris diameter in pixels (1 decimal).
    pub iris_diameter_px: f64,
    /// Pupil diameter in pixels (1 decimal).
    pub pupil_diameter_px: f64,
}

impl FeatureVector {
    /// Build classifier input from the three scored features alone.
    ///
    /// Pixel diameters are not known here and stay at zero, so the result is
    /// only meant for [`classify`](crate::classify::classify). Analysis results
    /// carry vectors built by [`extract_features`], which fills in the measured
    /// diameters.
    pub fn from_scores(ratio: f64, eccentricity: f64, size: f64) -> Self {
        Self {
            iris_pupil_ratio: round_to(ratio, 3),
            pupil_eccentricity: round_to(eccentricity, 3),
            normalized_pupil_size: round_to(size, 3),
            iris_diameter_px: 0.0,
            pupil_diameter_px: 0.0,
        }
    }
}

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Compute the feature vector. `iris.radius` is positive by construction.
pub fn extract_features(iris: &IrisObservation, pupil: &PupilObservation) -> FeatureVector {
    let dx = (pupil.center[0] - iris.center[0]) as f64;
    let dy = (pupil.center[1] - iris.center[1]) as f64;
    let offset = (dx * dx + dy * dy).sqrt();
    let size = (pupil.radius / iris.radius).powi(2);

    FeatureVector {
        iris_pupil_ratio: round_to(pupil.diameter_px / iris.diameter_px, 3),
        pupil_eccentricity: round_to(offset / iris.radius, 3),
        normalized_pupil_size: round_to(size, 3),
        iris_diameter_px: round_to(iris.diameter_px, 1),
        pupil_diameter_px: round_to(pupil.diameter_px, 1),
    }
}
