//! Shared test utilities for image-based unit tests.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::landmarks::LandmarkSet;

/// Sclera-like background level of the synthetic eye.
pub(crate) const SCLERA_PIX: u8 = 200;
/// Iris level; close to the background so a global threshold isolates the pupil.
pub(crate) const IRIS_PIX: u8 = 170;
/// Pupil level.
pub(crate) const PUPIL_PIX: u8 = 20;

/// Dark shape drawn inside the iris disk.
#[derive(Debug, Clone, Copy)]
pub(crate) enum EyeShape {
    /// Circular pupil.
    Disk { center: [f32; 2], radius: f32 },
    /// Axis-aligned ellipse with `semi_axes = [a_x, a_y]`.
    Ellipse {
        center: [f32; 2],
        semi_axes: [f32; 2],
    },
}

impl EyeShape {
    fn contains(&self, x: f32, y: f32) -> bool {
        match *self {
            Self::Disk { center, radius } => {
                let dx = x - center[0];
                let dy = y - center[1];
                (dx * dx + dy * dy).sqrt() <= radius
            }
            Self::Ellipse { center, semi_axes } => {
                let u = (x - center[0]) / semi_axes[0];
                let v = (y - center[1]) / semi_axes[1];
                u * u + v * v <= 1.0
            }
        }
    }
}

/// Render a single-channel image with one filled disk.
///
/// Pixels at distance `d <= radius` from `center` get `disk_pix`, the rest `bg_pix`.
pub(crate) fn draw_disk_gray(
    w: u32,
    h: u32,
    center: [f32; 2],
    radius: f32,
    disk_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let shape = EyeShape::Disk { center, radius };
    GrayImage::from_fn(w, h, |x, y| {
        if shape.contains(x as f32, y as f32) {
            Luma([disk_pix])
        } else {
            Luma([bg_pix])
        }
    })
}

/// Render a synthetic eye: a dark `shape` over a mid-gray iris disk on a bright background.
pub(crate) fn draw_eye_image_with(
    w: u32,
    h: u32,
    iris_center: [f32; 2],
    iris_radius: f32,
    shape: EyeShape,
) -> RgbImage {
    let iris = EyeShape::Disk {
        center: iris_center,
        radius: iris_radius,
    };
    RgbImage::from_fn(w, h, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let v = if shape.contains(fx, fy) {
            PUPIL_PIX
        } else if iris.contains(fx, fy) {
            IRIS_PIX
        } else {
            SCLERA_PIX
        };
        Rgb([v, v, v])
    })
}

/// Render a synthetic eye with a circular pupil.
pub(crate) fn draw_eye_image(
    w: u32,
    h: u32,
    iris_center: [f32; 2],
    iris_radius: f32,
    pupil_center: [f32; 2],
    pupil_radius: f32,
) -> RgbImage {
    draw_eye_image_with(
        w,
        h,
        iris_center,
        iris_radius,
        EyeShape::Disk {
            center: pupil_center,
            radius: pupil_radius,
        },
    )
}

/// Normalized landmarks for an iris at integer `center` with integer radius `r`.
///
/// Order: center, right, top, left, bottom. Coordinates point at pixel
/// centers so truncation recovers the exact pixels.
pub(crate) fn iris_landmarks(w: u32, h: u32, center: [i32; 2], r: i32) -> LandmarkSet {
    let [cx, cy] = center;
    let px = [[cx, cy], [cx + r, cy], [cx, cy - r], [cx - r, cy], [cx, cy + r]];
    LandmarkSet::new(px.map(|[x, y]| {
        [
            (x as f64 + 0.5) / w as f64,
            (y as f64 + 0.5) / h as f64,
        ]
    }))
}
