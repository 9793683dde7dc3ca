//! Shape gates and scoring of segmented regions.

use imageproc::point::Point;

use crate::config::PupilConfig;

/// Zeroth and first order moments of a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PolygonMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl PolygonMoments {
    /// Green's-theorem moments of the polygon traced by `points`.
    ///
    /// The orientation is normalized so that `m00` is the (non-negative) area.
    pub fn of(points: &[Point<i32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self {
                m00: 0.0,
                m10: 0.0,
                m01: 0.0,
            };
        }
        let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
        for i in 0..n {
            let p = points[(i + n - 1) % n];
            let q = points[i];
            let (x0, y0) = (p.x as f64, p.y as f64);
            let (x1, y1) = (q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            a00 += cross;
            a10 += cross * (x0 + x1);
            a01 += cross * (y0 + y1);
        }
        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Self {
            m00: sign * a00 * 0.5,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// Centroid, or `None` for a degenerate polygon.
    pub fn centroid(&self) -> Option<[f64; 2]> {
        if self.m00 == 0.0 {
            return None;
        }
        Some([self.m10 / self.m00, self.m01 / self.m00])
    }
}

/// A region that passed every shape gate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PupilCandidate {
    /// Index of the region in the segmentation output.
    pub region: usize,
    /// Enclosed area (px²).
    pub area: f64,
    /// `4π·area/perimeter²`, 1.0 for a perfect circle.
    pub circularity: f64,
    /// Truncated centroid in image coordinates.
    pub center: [i32; 2],
    /// Distance from the centroid to the iris center (px).
    pub distance: f64,
}

impl PupilCandidate {
    /// Large, round and central regions score highest.
    pub fn score(&self) -> f64 {
        self.area * self.circularity / (self.distance + 1.0)
    }
}

/// Iris reference used to gate regions, in integer pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IrisFrame {
    pub center: [i32; 2],
    pub radius_px: i32,
}

impl IrisFrame {
    fn area(&self) -> f64 {
        std::f64::consts::PI * (self.radius_px as f64).powi(2)
    }
}

/// Apply the area, shape and position gates to every region.
///
/// `origin` maps crop-local contour points to image coordinates.
pub(crate) fn collect_candidates(
    regions: &[Vec<Point<i32>>],
    origin: [i32; 2],
    iris: IrisFrame,
    config: &PupilConfig,
) -> Vec<PupilCandidate> {
    let iris_area = iris.area();
    let max_distance = iris.radius_px as f64 * config.max_center_distance;
    let mut out = Vec::new();

    for (region, points) in regions.iter().enumerate() {
        let moments = PolygonMoments::of(points);
        let area = moments.m00;
        if area < config.min_region_area {
            continue;
        }
        let perimeter = imageproc::geometry::arc_length(points, true);
        if perimeter <= 0.0 {
            continue;
        }
        let circularity = 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
        let area_ratio = area / iris_area;
        if !(config.min_area_ratio..=config.max_area_ratio).contains(&area_ratio)
            || circularity < config.min_circularity
        {
            continue;
        }
        let Some([lx, ly]) = moments.centroid() else {
            continue;
        };
        let center = [lx as i32 + origin[0], ly as i32 + origin[1]];
        let dx = (center[0] - iris.center[0]) as f64;
        let dy = (center[1] - iris.center[1]) as f64;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > max_distance {
            continue;
        }
        out.push(PupilCandidate {
            region,
            area,
            circularity,
            center,
            distance,
        });
    }
    out
}

/// Highest-scoring candidate; the earliest one wins ties.
pub(crate) fn select_best(candidates: &[PupilCandidate]) -> Option<&PupilCandidate> {
    let mut best: Option<&PupilCandidate> = None;
    for c in candidates {
        match best {
            Some(b) if c.score() <= b.score() => {}
            _ => best = Some(c),
        }
    }
    best
}
