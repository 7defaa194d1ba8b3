//! Sobel edge detection over the luma channel.

use image::GrayImage;
use serde::Serialize;

use super::raster::BitGrid;

/// Gradient magnitude above which a pixel is an edge.
pub const EDGE_MAGNITUDE_THRESHOLD: f32 = 40.0;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeStats {
    pub edge_pixels: usize,
    /// Edge pixels / opaque pixels, in [0, 1].
    pub edge_density: f64,
}

/// Binary edge mask plus density.
///
/// The one-pixel border has no full 3x3 neighbourhood and is never an edge.
/// Transparent pixels are never edges and do not count toward density.
pub fn detect_edges(gray: &GrayImage, opaque: &BitGrid) -> (BitGrid, EdgeStats) {
    let (w, h) = (gray.width(), gray.height());
    let mut mask = BitGrid::new(w, h);

    if w >= 3 && h >= 3 {
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let idx = mask.index(x, y);
                if !opaque.get(idx) {
                    continue;
                }
                if gradient_magnitude(gray, x, y) > EDGE_MAGNITUDE_THRESHOLD {
                    mask.set(idx);
                }
            }
        }
    }

    let edge_pixels = mask.count_ones();
    let opaque_pixels = opaque.count_ones();
    let edge_density = if opaque_pixels == 0 {
        0.0
    } else {
        edge_pixels as f64 / opaque_pixels as f64
    };

    (
        mask,
        EdgeStats {
            edge_pixels,
            edge_density,
        },
    )
}

/// `sqrt(gx^2 + gy^2)` of the 3x3 Sobel responses at an interior pixel.
fn gradient_magnitude(gray: &GrayImage, x: u32, y: u32) -> f32 {
    let mut gx = 0i32;
    let mut gy = 0i32;
    for ky in 0..3u32 {
        for kx in 0..3u32 {
            let v = gray.get_pixel(x + kx - 1, y + ky - 1).0[0] as i32;
            gx += v * SOBEL_X[ky as usize][kx as usize];
            gy += v * SOBEL_Y[ky as usize][kx as usize];
        }
    }
    ((gx * gx + gy * gy) as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn all_opaque(w: u32, h: u32) -> BitGrid {
        let mut grid = BitGrid::new(w, h);
        for idx in 0..grid.len() {
            grid.set(idx);
        }
        grid
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let gray = GrayImage::from_pixel(20, 20, Luma([128]));
        let (mask, stats) = detect_edges(&gray, &all_opaque(20, 20));
        assert_eq!(mask.count_ones(), 0);
        assert_eq!(stats.edge_density, 0.0);
    }

    #[test]
    fn vertical_step_marks_two_columns() {
        let gray = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([0]) } else { Luma([200]) });
        let (mask, stats) = detect_edges(&gray, &all_opaque(20, 10));
        // Columns 9 and 10 straddle the step; rows 1..=8 are interior.
        assert_eq!(stats.edge_pixels, 2 * 8);
        assert!(mask.get(mask.index(9, 5)));
        assert!(mask.get(mask.index(10, 5)));
        assert!(!mask.get(mask.index(8, 5)));
        assert!((stats.edge_density - 16.0 / 200.0).abs() < 1e-9);
    }

    #[test]
    fn weak_gradient_below_threshold() {
        // Step of 10 -> Sobel response 40, not strictly above the threshold.
        let gray = GrayImage::from_fn(10, 10, |x, _| if x < 5 { Luma([100]) } else { Luma([110]) });
        let (_, stats) = detect_edges(&gray, &all_opaque(10, 10));
        assert_eq!(stats.edge_pixels, 0);
    }

    #[test]
    fn transparent_pixels_are_not_edges() {
        let gray = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([0]) } else { Luma([200]) });
        let (_, stats) = detect_edges(&gray, &BitGrid::new(20, 10));
        assert_eq!(stats.edge_pixels, 0);
        assert_eq!(stats.edge_density, 0.0);
    }

    #[test]
    fn tiny_image_has_no_interior() {
        let gray = GrayImage::from_fn(2, 2, |x, _| Luma([(x * 255) as u8]));
        let (_, stats) = detect_edges(&gray, &all_opaque(2, 2));
        assert_eq!(stats.edge_pixels, 0);
    }
}
