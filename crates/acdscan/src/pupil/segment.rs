//! Crop, smoothing and binary segmentation of the iris neighborhood.
//!
//! Foreground is always the dark side of the threshold, so pupil-like
//! regions come out as white (255) blobs on a black background.

use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::separable_filter_equal;
use imageproc::point::Point;

use crate::config::PupilConfig;

/// Axis-aligned crop window in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Offset that maps crop-local coordinates back to the source image.
    pub fn origin(&self) -> [i32; 2] {
        [self.x as i32, self.y as i32]
    }
}

/// Square window of half-size `r + padding` around `center`, clipped to the image.
///
/// Returns `None` when the clipped window is empty.
pub(crate) fn crop_region(
    width: u32,
    height: u32,
    center: [i32; 2],
    iris_radius_px: i32,
    config: &PupilConfig,
) -> Option<CropRegion> {
    let padding = config
        .min_padding_px
        .max((iris_radius_px as f64 * config.padding_fraction) as i32);
    let half = iris_radius_px as i64 + padding as i64;
    let x1 = (center[0] as i64 - half).max(0);
    let y1 = (center[1] as i64 - half).max(0);
    let x2 = (center[0] as i64 + half).min(width as i64);
    let y2 = (center[1] as i64 + half).min(height as i64);
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(CropRegion {
        x: x1 as u32,
        y: y1 as u32,
        width: (x2 - x1) as u32,
        height: (y2 - y1) as u32,
    })
}

/// BT.601 luma of the cropped window.
pub(crate) fn luma_crop(image: &RgbImage, region: CropRegion) -> GrayImage {
    GrayImage::from_fn(region.width, region.height, |x, y| {
        let [r, g, b] = image.get_pixel(region.x + x, region.y + y).0;
        let v = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Normalized 1-D Gaussian weights over `size` taps (made odd, at least 1).
pub(crate) fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let size = size.max(1) | 1;
    let center = (size / 2) as f32;
    let denom = 2.0 * sigma.max(0.01).powi(2);
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| (-(i as f32 - center).powi(2) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

fn blur_f32(gray: &GrayImage, kernel: &[f32]) -> ImageBuffer<Luma<f32>, Vec<f32>> {
    let (w, h) = gray.dimensions();
    let f = ImageBuffer::<Luma<f32>, Vec<f32>>::from_fn(w, h, |x, y| {
        Luma([gray.get_pixel(x, y)[0] as f32])
    });
    separable_filter_equal(&f, kernel)
}

/// Gaussian-smooth a luma image over a `blur_kernel_size` window, rounding
/// back to 8 bits.
pub(crate) fn smooth(gray: &GrayImage, config: &PupilConfig) -> GrayImage {
    let kernel = gaussian_kernel(config.blur_kernel_size, config.blur_sigma);
    let blurred = blur_f32(gray, &kernel);
    let (w, h) = gray.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        Luma([blurred.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    })
}

/// Global Otsu threshold, inverted: pixels at or below the level become foreground.
pub(crate) fn otsu_segment(smoothed: &GrayImage) -> GrayImage {
    let level = otsu_level(smoothed);
    tracing::trace!(level, "otsu threshold");
    threshold(smoothed, level, ThresholdType::BinaryInverted)
}

/// Local-adaptive threshold against a Gaussian-weighted neighborhood mean.
///
/// A pixel is foreground when it is at least `adaptive_bias` darker than the
/// (rounded) mean of its `adaptive_block_size` neighborhood.
pub(crate) fn adaptive_segment(smoothed: &GrayImage, config: &PupilConfig) -> GrayImage {
    let kernel = gaussian_kernel(config.adaptive_block_size, config.adaptive_sigma());
    let local_mean = blur_f32(smoothed, &kernel);
    let (w, h) = smoothed.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let src = smoothed.get_pixel(x, y)[0] as f32;
        let mean = local_mean.get_pixel(x, y)[0].round();
        if src <= mean - config.adaptive_bias {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Outermost boundaries of the foreground regions of a binary image.
pub(crate) fn external_regions(binary: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::draw_disk_gray;
    use approx::assert_abs_diff_eq;

    #[test]
    fn crop_is_padded_and_clipped() {
        let cfg = PupilConfig::default();
        // r = 40 -> padding = max(15, 16) = 16, half = 56
        let c = crop_region(200, 200, [100, 100], 40, &cfg).unwrap();
        assert_eq!(
            c,
            CropRegion {
                x: 44,
                y: 44,
                width: 112,
                height: 112
            }
        );

        // r = 20 -> padding = 15, clipped at the left/top edges
        let c = crop_region(200, 200, [10, 30], 20, &cfg).unwrap();
        assert_eq!(
            c,
            CropRegion {
                x: 0,
                y: 0,
                width: 45,
                height: 65
            }
        );
        assert_eq!(c.origin(), [0, 0]);
    }

    #[test]
    fn crop_outside_image_is_empty() {
        let cfg = PupilConfig::default();
        assert!(crop_region(100, 100, [400, 50], 20, &cfg).is_none());
        assert!(crop_region(0, 0, [0, 0], 20, &cfg).is_none());
    }

    #[test]
    fn luma_uses_bt601_weights() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        let g = luma_crop(
            &img,
            CropRegion {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
        );
        assert_eq!(g.get_pixel(0, 0)[0], 76);
    }

    fn impulse(size: u32) -> GrayImage {
        let mut img = GrayImage::new(size, size);
        img.put_pixel(size / 2, size / 2, Luma([255]));
        img
    }

    /// Columns of the center row touched by a blurred single-pixel impulse.
    fn window_width(blurred: &ImageBuffer<Luma<f32>, Vec<f32>>) -> usize {
        let row = blurred.height() / 2;
        (0..blurred.width())
            .filter(|&x| blurred.get_pixel(x, row)[0] > 0.0)
            .count()
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(11, 2.0);
        assert_eq!(k.len(), 11);
        assert_abs_diff_eq!(k.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        for i in 0..5 {
            assert_abs_diff_eq!(k[i], k[10 - i], epsilon = 1e-7);
            assert!(k[i] < k[i + 1]);
        }
        assert_eq!(gaussian_kernel(10, 2.0).len(), 11);
        assert_eq!(gaussian_kernel(0, 2.0), vec![1.0]);
    }

    #[test]
    fn adaptive_window_matches_block_size() {
        let img = impulse(41);
        for block in [11u32, 31] {
            let cfg = PupilConfig {
                adaptive_block_size: block,
                ..PupilConfig::default()
            };
            let blurred = blur_f32(&img, &gaussian_kernel(block, cfg.adaptive_sigma()));
            assert_eq!(window_width(&blurred), block as usize);
            let touched = blurred.pixels().filter(|p| p[0] > 0.0).count();
            assert_eq!(touched, (block * block) as usize);
        }
    }

    #[test]
    fn smoothing_window_is_five_taps() {
        let cfg = PupilConfig::default();
        let kernel = gaussian_kernel(cfg.blur_kernel_size, cfg.blur_sigma);
        let blurred = blur_f32(&impulse(21), &kernel);
        assert_eq!(window_width(&blurred), 5);
        let total: f32 = blurred.pixels().map(|p| p[0]).sum();
        assert_abs_diff_eq!(total, 255.0, epsilon = 1e-2);
    }

    #[test]
    fn otsu_isolates_dark_disk() {
        let img = draw_disk_gray(80, 80, [40.0, 40.0], 12.0, 20, 200);
        let binary = otsu_segment(&smooth(&img, &PupilConfig::default()));
        assert_eq!(binary.get_pixel(40, 40)[0], 255);
        assert_eq!(binary.get_pixel(2, 2)[0], 0);
        assert_eq!(external_regions(&binary).len(), 1);
    }

    #[test]
    fn adaptive_marks_dark_spot_only() {
        let img = draw_disk_gray(60, 60, [30.0, 30.0], 3.0, 60, 180);
        let binary = adaptive_segment(&img, &PupilConfig::default());
        assert_eq!(binary.get_pixel(30, 30)[0], 255);
        assert_eq!(binary.get_pixel(5, 5)[0], 0);
        assert_eq!(external_regions(&binary).len(), 1);
    }

    #[test]
    fn blank_binary_has_no_regions() {
        let binary = GrayImage::new(32, 32);
        assert!(external_regions(&binary).is_empty());
    }

    #[test]
    fn nested_regions_report_only_the_outer_one() {
        // dark ring with a bright hole that contains a dark dot
        let mut img = draw_disk_gray(60, 60, [30.0, 30.0], 20.0, 0, 255);
        for y in 0..60u32 {
            for x in 0..60u32 {
                let d = ((x as f32 - 30.0).powi(2) + (y as f32 - 30.0).powi(2)).sqrt();
                if d < 12.0 && d >= 4.0 {
                    img.put_pixel(x, y, Luma([255]));
                }
            }
        }
        let binary = threshold(&img, 128, ThresholdType::BinaryInverted);
        assert_eq!(external_regions(&binary).len(), 1);
    }
}
