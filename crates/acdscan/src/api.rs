//! High-level analysis API.
//!
//! [`EyeAnalyzer`] is the primary entry point. It wraps an
//! [`AnalyzeConfig`] and runs the full pipeline on one eye per call.

use image::RgbImage;

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::landmarks::{EyeSide, LandmarkSet, LandmarkSource};
use crate::pipeline::{self, AnalysisResult};

/// Primary analysis interface.
///
/// Holds no per-call state, so one analyzer can serve many threads.
/// Create once, analyze many images.
///
/// # Examples
///
/// ```no_run
/// use acdscan::{EyeAnalyzer, EyeSide, FixedLandmarks};
/// use image::RgbImage;
///
/// let analyzer = EyeAnalyzer::new();
/// let image = RgbImage::new(640, 480);
/// let mut source = FixedLandmarks::default();
/// match analyzer.analyze_with_source(&image, &mut source, EyeSide::Right) {
///     Ok(res) => println!("risk: {}", res.prediction.risk_level),
///     Err(err) => println!("failed: {}", err),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EyeAnalyzer {
    config: AnalyzeConfig,
}

impl EyeAnalyzer {
    /// Create an analyzer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: AnalyzeConfig) -> Self {
        Self { config }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &AnalyzeConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut AnalyzeConfig {
        &mut self.config
    }

    /// Analyze `eye`, whose landmarks are already known.
    pub fn analyze(
        &self,
        image: &RgbImage,
        landmarks: &LandmarkSet,
        eye: EyeSide,
    ) -> Result<AnalysisResult, AnalyzeError> {
        pipeline::analyze_landmarks(image, landmarks, eye, &self.config)
    }

    /// Ask `source` for the landmarks of `eye`, then analyze.
    ///
    /// Fails with [`AnalyzeError::NoFaceDetected`] when the source finds no face.
    pub fn analyze_with_source<S>(
        &self,
        image: &RgbImage,
        source: &mut S,
        eye: EyeSide,
    ) -> Result<AnalysisResult, AnalyzeError>
    where
        S: LandmarkSource + ?Sized,
    {
        pipeline::analyze_with_source(image, source, eye, &self.config)
    }
}
