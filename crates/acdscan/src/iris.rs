//! Iris geometry from normalized landmarks.

use crate::config::IrisConfig;
use crate::error::AnalyzeError;
use crate::landmarks::{LandmarkSet, IRIS_LANDMARK_COUNT};

/// Iris circle in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IrisObservation {
    /// Integer mean of the landmark pixels.
    pub center: [i32; 2],
    /// Largest distance from `center` to any landmark pixel.
    pub radius: f64,
    /// `2 · radius`.
    pub diameter_px: f64,
    /// Landmark pixels in source order.
    pub points: [[i32; 2]; IRIS_LANDMARK_COUNT],
}

/// Resolve the iris circle from five normalized landmarks.
///
/// Each coordinate is scaled by the image size and truncated toward zero.
/// Fails with [`AnalyzeError::OutOfBounds`] when a landmark falls outside
/// the image and with [`AnalyzeError::InvalidGeometry`] when the radius is
/// outside `config.radius_range(width, height)`.
pub fn resolve_iris(
    landmarks: &LandmarkSet,
    width: u32,
    height: u32,
    config: &IrisConfig,
) -> Result<IrisObservation, AnalyzeError> {
    let mut points = [[0i32; 2]; IRIS_LANDMARK_COUNT];
    for (index, (&[nx, ny], out)) in landmarks.points().iter().zip(points.iter_mut()).enumerate() {
        if !nx.is_finite() || !ny.is_finite() {
            return Err(AnalyzeError::NonFiniteLandmark {
                index,
                x: nx,
                y: ny,
            });
        }
        let x = (nx * width as f64).trunc() as i64;
        let y = (ny * height as f64).trunc() as i64;
        if x < 0 || x >= width as i64 || y < 0 || y >= height as i64 {
            return Err(AnalyzeError::OutOfBounds {
                index,
                x,
                y,
                width,
                height,
            });
        }
        *out = [x as i32, y as i32];
    }

    let n = IRIS_LANDMARK_COUNT as i64;
    let sum_x: i64 = points.iter().map(|p| p[0] as i64).sum();
    let sum_y: i64 = points.iter().map(|p| p[1] as i64).sum();
    let center = [(sum_x / n) as i32, (sum_y / n) as i32];

    let radius = points
        .iter()
        .map(|p| {
            let dx = (p[0] - center[0]) as f64;
            let dy = (p[1] - center[1]) as f64;
            (dx * dx + dy * dy).sqrt()
        })
        .fold(0.0f64, f64::max);

    let [min_radius, max_radius] = config.radius_range(width, height);
    if radius < min_radius || radius > max_radius {
        return Err(AnalyzeError::InvalidGeometry {
            radius,
            min_radius,
            max_radius,
        });
    }

    Ok(IrisObservation {
        center,
        radius,
        diameter_px: 2.0 * radius,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::iris_landmarks;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn resolves_center_and_radius() {
        let lm = iris_landmarks(200, 200, [100, 100], 40);
        let iris = resolve_iris(&lm, 200, 200, &IrisConfig::default()).unwrap();
        assert_eq!(iris.center, [100, 100]);
        assert_abs_diff_eq!(iris.radius, 40.0);
        assert_abs_diff_eq!(iris.diameter_px, 80.0);
        assert_eq!(iris.points[1], [140, 100]);
    }

    #[test]
    fn center_is_truncated_mean() {
        // x sum = 503, y sum = 502 -> (100, 100)
        let px = [[100, 100], [141, 100], [100, 61], [61, 100], [101, 141]];
        let lm = LandmarkSet::new(
            px.map(|[x, y]| [(x as f64 + 0.5) / 200.0, (y as f64 + 0.5) / 200.0]),
        );
        let iris = resolve_iris(&lm, 200, 200, &IrisConfig::default()).unwrap();
        assert_eq!(iris.center, [100, 100]);
        assert_abs_diff_eq!(iris.radius, 41.0_f64.hypot(1.0), epsilon = 1e-12);
    }

    #[test]
    fn too_small_radius_is_invalid_geometry() {
        let lm = iris_landmarks(200, 200, [100, 100], 5);
        let err = resolve_iris(&lm, 200, 200, &IrisConfig::default()).unwrap_err();
        match err {
            AnalyzeError::InvalidGeometry { radius, .. } => assert_abs_diff_eq!(radius, 5.0),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn too_large_radius_is_invalid_geometry() {
        // radius 60 on a 100px-high image exceeds 50
        let px = [[90, 50], [150, 50], [210, 50], [150, 50], [150, 50]];
        let lm = LandmarkSet::new(
            px.map(|[x, y]| [(x as f64 + 0.5) / 300.0, (y as f64 + 0.5) / 100.0]),
        );
        let err = resolve_iris(&lm, 300, 100, &IrisConfig::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_geometry");
    }

    #[test]
    fn landmark_outside_image_is_out_of_bounds() {
        let mut pts = *iris_landmarks(200, 200, [100, 100], 40).points();
        pts[2] = [1.0, 0.5];
        let err = resolve_iris(&LandmarkSet::new(pts), 200, 200, &IrisConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::OutOfBounds {
                index: 2,
                x: 200,
                y: 100,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn non_finite_landmark_is_out_of_bounds() {
        let mut pts = *iris_landmarks(200, 200, [100, 100], 40).points();
        pts[2] = [f64::NAN, 0.5];
        let err = resolve_iris(&LandmarkSet::new(pts), 200, 200, &IrisConfig::default())
            .unwrap_err();
        assert_eq!(err.code(), "out_of_bounds");
        assert!(matches!(err, AnalyzeError::NonFiniteLandmark { index: 2, y, .. } if y == 0.5));
        assert!(!err.to_string().contains(&i64::MIN.to_string()));

        pts[2] = [0.5, f64::INFINITY];
        let err = resolve_iris(&LandmarkSet::new(pts), 200, 200, &IrisConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("(0.5, inf)"));
    }

    #[test]
    fn radius_matches_max_centroid_distance_on_random_sets() {
        let (w, h) = (400u32, 300u32);
        let cfg = IrisConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let px: [[i32; 2]; 5] = std::array::from_fn(|_| {
                [rng.gen_range(0..w as i32), rng.gen_range(0..h as i32)]
            });
            let lm = LandmarkSet::new(
                px.map(|[x, y]| [(x as f64 + 0.5) / w as f64, (y as f64 + 0.5) / h as f64]),
            );

            let cx = px.iter().map(|p| p[0]).sum::<i32>() / 5;
            let cy = px.iter().map(|p| p[1]).sum::<i32>() / 5;
            let expected = px
                .iter()
                .map(|p| (((p[0] - cx).pow(2) + (p[1] - cy).pow(2)) as f64).sqrt())
                .fold(0.0, f64::max);

            match resolve_iris(&lm, w, h, &cfg) {
                Ok(iris) => {
                    assert_eq!(iris.points, px);
                    assert_eq!(iris.center, [cx, cy]);
                    assert_eq!(iris.radius, expected);
                }
                Err(AnalyzeError::InvalidGeometry { radius, .. }) => {
                    assert_eq!(radius, expected);
                    assert!(!(10.0..=150.0).contains(&expected));
                }
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
    }
}
