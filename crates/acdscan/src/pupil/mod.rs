//! Pupil localization inside a resolved iris.
//!
//! The localizer segments the darker part of the iris neighborhood, scores
//! the resulting regions, and fits a circle to the winner:
//!
//! 1. **Crop** – square window around the iris with padding, clipped.
//! 2. **Segment** – inverted Otsu threshold on the smoothed luma; when that
//!    yields no region, a local-adaptive threshold is tried instead.
//! 3. **Gate** – regions must have a plausible area relative to the iris,
//!    be round enough, and sit near the iris center.
//! 4. **Select** – maximize `area · circularity / (distance + 1)`.
//! 5. **Fit** – minimum enclosing circle of the winning contour.
//!
//! Every stage that can come up empty has its own [`FallbackReason`]. In all
//! of those cases the localizer returns the geometric fallback instead of an
//! error, so a pupil estimate is always available.

mod candidates;
mod enclosing_circle;
mod segment;

use image::RgbImage;

use crate::config::PupilConfig;
use crate::iris::IrisObservation;

use candidates::{collect_candidates, select_best, IrisFrame};
use enclosing_circle::min_enclosing_circle;
use segment::{adaptive_segment, crop_region, external_regions, luma_crop, otsu_segment, smooth};

/// How the pupil circle was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PupilMethod {
    /// Fitted to a segmented region.
    Segmented,
    /// Geometric estimate from the iris.
    Fallback,
}

impl PupilMethod {
    /// Wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Segmented => "segmented",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for PupilMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why segmentation gave way to the geometric fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The clipped crop window is empty.
    EmptyCrop,
    /// Neither threshold produced a foreground region.
    NoRegions,
    /// No region passed the area, shape and position gates.
    NoCandidates,
    /// The fitted circle radius is implausibly small or large.
    FitOutOfRange,
}

impl FallbackReason {
    /// Stable reason code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyCrop => "empty_crop",
            Self::NoRegions => "no_regions",
            Self::NoCandidates => "no_candidates",
            Self::FitOutOfRange => "fit_out_of_range",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Pupil circle in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PupilObservation {
    /// Pupil center.
    pub center: [i32; 2],
    /// Pupil radius (pixels).
    pub radius: f64,
    /// `2 · radius`.
    pub diameter_px: f64,
    /// Segmented or fallback.
    #[serde(rename = "detection_method")]
    pub method: PupilMethod,
    /// Set only for fallback observations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}

impl PupilObservation {
    /// Population-typical pupil centered in the iris.
    ///
    /// `radius = config.fallback_radius_ratio × iris.radius`.
    pub fn fallback(iris: &IrisObservation, reason: FallbackReason, config: &PupilConfig) -> Self {
        let radius = config.fallback_radius_ratio * iris.radius;
        tracing::debug!(reason = reason.code(), radius, "pupil fallback");
        Self {
            center: iris.center,
            radius,
            diameter_px: 2.0 * radius,
            method: PupilMethod::Fallback,
            fallback_reason: Some(reason),
        }
    }

    fn segmented(center: [i32; 2], radius: f64) -> Self {
        Self {
            center,
            radius,
            diameter_px: 2.0 * radius,
            method: PupilMethod::Segmented,
            fallback_reason: None,
        }
    }
}

/// Locate the pupil inside `iris`. Never fails.
pub fn localize_pupil(
    image: &RgbImage,
    iris: &IrisObservation,
    config: &PupilConfig,
) -> PupilObservation {
    match segment_pupil(image, iris, config) {
        Ok(pupil) => pupil,
        Err(reason) => PupilObservation::fallback(iris, reason, config),
    }
}

fn segment_pupil(
    image: &RgbImage,
    iris: &IrisObservation,
    config: &PupilConfig,
) -> Result<PupilObservation, FallbackReason> {
    let frame = IrisFrame {
        center: iris.center,
        radius_px: iris.radius as i32,
    };
    let (w, h) = image.dimensions();
    let region = crop_region(w, h, frame.center, frame.radius_px, config)
        .ok_or(FallbackReason::EmptyCrop)?;

    let smoothed = smooth(&luma_crop(image, region), config);
    let mut regions = external_regions(&otsu_segment(&smoothed));
    if regions.is_empty() {
        tracing::debug!("global threshold found no regions, retrying adaptive");
        regions = external_regions(&adaptive_segment(&smoothed, config));
    }
    if regions.is_empty() {
        return Err(FallbackReason::NoRegions);
    }

    let candidates = collect_candidates(&regions, region.origin(), frame, config);
    let best = select_best(&candidates).ok_or(FallbackReason::NoCandidates)?;
    tracing::debug!(
        regions = regions.len(),
        candidates = candidates.len(),
        area = best.area,
        circularity = best.circularity,
        distance = best.distance,
        centroid_x = best.center[0],
        centroid_y = best.center[1],
        "pupil candidate selected"
    );

    let contour: Vec<[f64; 2]> = regions[best.region]
        .iter()
        .map(|p| [p.x as f64, p.y as f64])
        .collect();
    let circle = min_enclosing_circle(&contour).ok_or(FallbackReason::NoCandidates)?;
    let origin = region.origin();
    let center = [
        circle.center.x as i32 + origin[0],
        circle.center.y as i32 + origin[1],
    ];
    let radius = circle.radius.trunc();

    let max_radius = frame.radius_px as f64 * config.max_fit_radius_fraction;
    if radius < config.min_fit_radius_px || radius > max_radius {
        tracing::debug!(radius, max_radius, "fitted pupil radius out of range");
        return Err(FallbackReason::FitOutOfRange);
    }
    Ok(PupilObservation::segmented(center, radius))
}
