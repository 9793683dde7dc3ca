use std::path::Path;

/// Acceptance gates for the iris resolved from landmarks.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IrisConfig {
    /// Smallest accepted iris radius (pixels).
    pub min_radius_px: f64,
    /// Largest accepted iris radius as a fraction of the smaller image side.
    pub max_radius_fraction: f64,
}

impl Default for IrisConfig {
    fn default() -> Self {
        Self {
            min_radius_px: 10.0,
            max_radius_fraction: 0.5,
        }
    }
}

impl IrisConfig {
    /// Accepted radius range `[min, max]` for an image of the given size.
    pub fn radius_range(&self, width: u32, height: u32) -> [f64; 2] {
        let short_side = width.min(height) as f64;
        [self.min_radius_px, short_side * self.max_radius_fraction]
    }
}

/// Segmentation and candidate-scoring parameters of the pupil localizer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PupilConfig {
    /// Lower bound of the crop padding around the iris (pixels).
    pub min_padding_px: i32,
    /// Crop padding as a fraction of the iris radius.
    pub padding_fraction: f64,
    /// Window of the Gaussian that smooths the luma crop (odd, pixels).
    pub blur_kernel_size: u32,
    /// Gaussian sigma used to smooth the luma crop before thresholding.
    pub blur_sigma: f32,
    /// Neighborhood size of the local-adaptive retry (odd, pixels).
    pub adaptive_block_size: u32,
    /// Bias subtracted from the local mean in the adaptive retry.
    pub adaptive_bias: f32,
    /// Regions with a smaller area (px²) are ignored.
    pub min_region_area: f64,
    /// Minimum region area as a fraction of the iris disk area.
    pub min_area_ratio: f64,
    /// Maximum region area as a fraction of the iris disk area.
    pub max_area_ratio: f64,
    /// Minimum circularity `4π·area/perimeter²`.
    pub min_circularity: f64,
    /// Maximum centroid distance from the iris center, in iris radii.
    pub max_center_distance: f64,
    /// Smallest accepted fitted pupil radius (pixels).
    pub min_fit_radius_px: f64,
    /// Largest accepted fitted pupil radius, in iris radii.
    pub max_fit_radius_fraction: f64,
    /// Pupil/iris radius ratio used by the geometric fallback.
    pub fallback_radius_ratio: f64,
}

impl Default for PupilConfig {
    fn default() -> Self {
        Self {
            min_padding_px: 15,
            padding_fraction: 0.4,
            blur_kernel_size: 5,
            blur_sigma: 1.1,
            adaptive_block_size: 11,
            adaptive_bias: 2.0,
            min_region_area: 30.0,
            min_area_ratio: 0.08,
            max_area_ratio: 0.90,
            min_circularity: 0.4,
            max_center_distance: 1.2,
            min_fit_radius_px: 3.0,
            max_fit_radius_fraction: 0.95,
            fallback_radius_ratio: 0.33,
        }
    }
}

impl PupilConfig {
    /// Gaussian sigma equivalent to a square kernel of `adaptive_block_size`.
    ///
    /// Uses the usual `0.3·((k−1)/2 − 1) + 0.8` rule, so a block of 11 maps
    /// to sigma 2.0.
    pub fn adaptive_sigma(&self) -> f32 {
        let k = self.adaptive_block_size.max(3) as f32;
        0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
    }
}

/// Full analysis configuration.
///
/// Defaults reproduce the fixed clinical constants; a JSON file may override
/// any subset of fields.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    /// Iris acceptance gates.
    pub iris: IrisConfig,
    /// Pupil localizer parameters.
    pub pupil: PupilConfig,
}

impl AnalyzeConfig {
    /// Load a (possibly partial) configuration from JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn adaptive_sigma_for_default_block() {
        assert_abs_diff_eq!(PupilConfig::default().adaptive_sigma(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn default_window_sizes() {
        let cfg = PupilConfig::default();
        assert_eq!(cfg.blur_kernel_size, 5);
        assert_eq!(cfg.adaptive_block_size, 11);
    }

    #[test]
    fn radius_range_uses_short_side() {
        let r = IrisConfig::default().radius_range(640, 480);
        assert_eq!(r, [10.0, 240.0]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AnalyzeConfig =
            serde_json::from_str(r#"{"pupil": {"min_circularity": 0.5}}"#).unwrap();
        assert_abs_diff_eq!(cfg.pupil.min_circularity, 0.5);
        assert_abs_diff_eq!(cfg.pupil.fallback_radius_ratio, 0.33);
        assert_abs_diff_eq!(cfg.iris.min_radius_px, 10.0);
    }
}
