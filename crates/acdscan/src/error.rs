//! Terminal failure kinds of a single analysis call.

/// Errors that end an analysis call without producing a prediction.
///
/// Pupil segmentation problems are not represented here: the localizer always
/// recovers through its geometric fallback and reports reduced
/// `detection_quality` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    /// Input image is empty or could not be decoded.
    InvalidImage {
        /// Decoder message or a short description of the problem.
        reason: String,
    },
    /// The landmark source found no face in the image.
    NoFaceDetected,
    /// A landmark set was built from the wrong number of points.
    InvalidLandmarks {
        /// Required number of points.
        expected: usize,
        /// Number of points supplied.
        got: usize,
    },
    /// A landmark maps to a pixel outside the image.
    OutOfBounds {
        /// Index of the offending landmark.
        index: usize,
        /// Pixel x after scaling (truncated).
        x: i64,
        /// Pixel y after scaling (truncated).
        y: i64,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },
    /// A landmark has a NaN or infinite normalized coordinate.
    NonFiniteLandmark {
        /// Index of the offending landmark.
        index: usize,
        /// Normalized x as supplied.
        x: f64,
        /// Normalized y as supplied.
        y: f64,
    },
    /// Resolved iris radius lies outside the accepted range.
    InvalidGeometry {
        /// Resolved radius in pixels.
        radius: f64,
        /// Smallest accepted radius.
        min_radius: f64,
        /// Largest accepted radius.
        max_radius: f64,
    },
}

impl AnalyzeError {
    /// Machine-stable reason code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidImage { .. } => "invalid_image",
            Self::NoFaceDetected => "no_face_detected",
            Self::InvalidLandmarks { .. } => "invalid_landmarks",
            Self::OutOfBounds { .. } | Self::NonFiniteLandmark { .. } => "out_of_bounds",
            Self::InvalidGeometry { .. } => "invalid_geometry",
        }
    }
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImage { reason } => write!(f, "invalid image: {}", reason),
            Self::NoFaceDetected => f.write_str("no face detected in image"),
            Self::InvalidLandmarks { expected, got } => {
                write!(f, "invalid landmark set: need {} points, got {}", expected, got)
            }
            Self::OutOfBounds {
                index,
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "iris landmark {} at ({}, {}) is outside the {}x{} image",
                index, x, y, width, height
            ),
            Self::NonFiniteLandmark { index, x, y } => write!(
                f,
                "iris landmark {} has non-finite coordinates ({}, {})",
                index, x, y
            ),
            Self::InvalidGeometry {
                radius,
                min_radius,
                max_radius,
            } => write!(
                f,
                "invalid iris size: radius {:.1}px outside [{:.1}, {:.1}]",
                radius, min_radius, max_radius
            ),
        }
    }
}

impl std::error::Error for AnalyzeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AnalyzeError::NoFaceDetected.code(), "no_face_detected");
        let e = AnalyzeError::InvalidGeometry {
            radius: 5.0,
            min_radius: 10.0,
            max_radius: 100.0,
        };
        assert_eq!(e.code(), "invalid_geometry");
        assert!(e.to_string().contains("5.0px"));
    }

    #[test]
    fn out_of_bounds_message_names_landmark() {
        let e = AnalyzeError::OutOfBounds {
            index: 3,
            x: 640,
            y: 12,
            width: 640,
            height: 480,
        };
        assert_eq!(e.code(), "out_of_bounds");
        assert_eq!(
            e.to_string(),
            "iris landmark 3 at (640, 12) is outside the 640x480 image"
        );
    }

    #[test]
    fn non_finite_landmark_keeps_raw_coordinates() {
        let e = AnalyzeError::NonFiniteLandmark {
            index: 0,
            x: f64::NAN,
            y: 0.5,
        };
        assert_eq!(e.code(), "out_of_bounds");
        assert_eq!(
            e.to_string(),
            "iris landmark 0 has non-finite coordinates (NaN, 0.5)"
        );
    }
}
