//! Minimum enclosing circle of a point set (incremental Welzl construction).
//!
//! Points are processed in input order without shuffling, so the result is
//! fully deterministic for a given contour.

use nalgebra::{Matrix2, Point2, Vector2};

/// Circle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: &Point2<f64>) -> bool {
        nalgebra::distance(&self.center, p) <= self.radius * (1.0 + 1e-9) + 1e-9
    }

    fn from_diameter(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        let center = nalgebra::center(a, b);
        Self {
            center,
            radius: nalgebra::distance(&center, a),
        }
    }

    /// Circle through three points; falls back to the widest pair when collinear.
    fn from_three(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Self {
        let ab: Vector2<f64> = b - a;
        let ac: Vector2<f64> = c - a;
        let m = Matrix2::new(ab.x, ab.y, ac.x, ac.y);
        let rhs = Vector2::new(0.5 * ab.norm_squared(), 0.5 * ac.norm_squared());
        match m.try_inverse() {
            Some(inv) if m.determinant().abs() > 1e-12 => {
                let offset = inv * rhs;
                let center = a + offset;
                Self {
                    center,
                    radius: offset.norm(),
                }
            }
            _ => {
                let candidates = [
                    Self::from_diameter(a, b),
                    Self::from_diameter(a, c),
                    Self::from_diameter(b, c),
                ];
                candidates
                    .into_iter()
                    .fold(candidates[0], |best, circle| {
                        if circle.radius > best.radius {
                            circle
                        } else {
                            best
                        }
                    })
            }
        }
    }
}

/// Smallest circle containing every point, or `None` for an empty set.
pub(crate) fn min_enclosing_circle(points: &[[f64; 2]]) -> Option<Circle> {
    let pts: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p[0], p[1])).collect();
    let first = pts.first()?;
    let mut circle = Circle {
        center: *first,
        radius: 0.0,
    };

    for i in 1..pts.len() {
        if circle.contains(&pts[i]) {
            continue;
        }
        circle = Circle {
            center: pts[i],
            radius: 0.0,
        };
        for j in 0..i {
            if circle.contains(&pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(&pts[i], &pts[j]);
            for k in 0..j {
                if !circle.contains(&pts[k]) {
                    circle = Circle::from_three(&pts[i], &pts[j], &pts[k]);
                }
            }
        }
    }
    Some(circle)
}
