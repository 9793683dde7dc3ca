//! Iris landmarks and the landmark-source capability.
//!
//! The face-mesh model that produces landmarks lives outside this crate. The
//! pipeline only sees a [`LandmarkSource`], which returns at most one
//! [`LandmarkSet`] per call: five iris-boundary points for the requested eye,
//! normalized to `[0, 1)` in each axis. The first point is the iris center
//! landmark, the remaining four lie on the iris boundary, but the resolver
//! does not depend on that order.

use image::RgbImage;
use std::path::Path;

use crate::error::AnalyzeError;

/// Number of iris landmarks per eye.
pub const IRIS_LANDMARK_COUNT: usize = 5;

/// Which eye to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeSide {
    /// Subject's right eye.
    #[default]
    Right,
    /// Subject's left eye.
    Left,
}

impl EyeSide {
    /// Map the boolean `prefer_right_eye` flag of the service boundary.
    pub fn from_prefer_right(prefer_right: bool) -> Self {
        if prefer_right {
            Self::Right
        } else {
            Self::Left
        }
    }

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

impl std::fmt::Display for EyeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five normalized `(x, y)` iris landmarks for one eye.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: [[f64; 2]; IRIS_LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Build from exactly five normalized points.
    pub fn new(points: [[f64; 2]; IRIS_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice, rejecting any length other than five.
    pub fn from_slice(points: &[[f64; 2]]) -> Result<Self, AnalyzeError> {
        let points: [[f64; 2]; IRIS_LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| AnalyzeError::InvalidLandmarks {
                    expected: IRIS_LANDMARK_COUNT,
                    got: points.len(),
                })?;
        Ok(Self { points })
    }

    /// Normalized landmark coordinates in source order.
    pub fn points(&self) -> &[[f64; 2]; IRIS_LANDMARK_COUNT] {
        &self.points
    }
}

/// Capability that locates iris landmarks in an image.
///
/// Implementations are typically backed by a stateful vision model, so
/// `resolve` takes `&mut self`: one instance serves one call at a time.
/// Callers that need parallelism create one source per worker.
pub trait LandmarkSource {
    /// Return the landmarks of the requested eye, or `None` when no face is found.
    fn resolve(&mut self, image: &RgbImage, eye: EyeSide) -> Option<LandmarkSet>;

    /// Whether the underlying model finished initializing.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<F> LandmarkSource for F
where
    F: FnMut(&RgbImage, EyeSide) -> Option<LandmarkSet>,
{
    fn resolve(&mut self, image: &RgbImage, eye: EyeSide) -> Option<LandmarkSet> {
        self(image, eye)
    }
}

/// Landmarks known ahead of time, e.g. exported from an external face-mesh run.
///
/// JSON form: `{"right": [[x, y], ...5], "left": [[x, y], ...5]}`; either side
/// may be omitted.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FixedLandmarks {
    /// Right-eye landmarks, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<LandmarkSet>,
    /// Left-eye landmarks, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<LandmarkSet>,
}

impl FixedLandmarks {
    /// Landmarks for a single eye.
    pub fn single(eye: EyeSide, landmarks: LandmarkSet) -> Self {
        match eye {
            EyeSide::Right => Self {
                right: Some(landmarks),
                left: None,
            },
            EyeSide::Left => Self {
                right: None,
                left: Some(landmarks),
            },
        }
    }

    /// Load from a landmark JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Landmarks stored for `eye`.
    pub fn get(&self, eye: EyeSide) -> Option<LandmarkSet> {
        match eye {
            EyeSide::Right => self.right,
            EyeSide::Left => self.left,
        }
    }
}

impl LandmarkSource for FixedLandmarks {
    fn resolve(&mut self, _image: &RgbImage, eye: EyeSide) -> Option<LandmarkSet> {
        self.get(eye)
    }
}
