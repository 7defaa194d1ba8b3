//! Patch-wise intensity variation.

use image::GrayImage;
use serde::Serialize;

use super::raster::BitGrid;

/// Side length of a square texture patch.
pub const PATCH_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextureStats {
    /// Mean per-patch standard deviation / 255, in [0, 1].
    pub score: f64,
    /// Patches that contributed (at least one opaque pixel).
    pub patches: usize,
}

/// Tile the image into full 16x16 patches and average their standard deviation.
///
/// Partial tiles at the right and bottom edges are skipped. An image smaller
/// than one tile is treated as a single patch. Only opaque pixels count.
pub fn analyze_texture(gray: &GrayImage, opaque: &BitGrid) -> TextureStats {
    let (w, h) = (gray.width(), gray.height());
    if w == 0 || h == 0 {
        return TextureStats::default();
    }

    let (patch_w, patch_h) = if w < PATCH_SIZE || h < PATCH_SIZE {
        (w, h)
    } else {
        (PATCH_SIZE, PATCH_SIZE)
    };

    let mut total_std = 0.0f64;
    let mut patches = 0usize;

    let mut y = 0;
    while y + patch_h <= h {
        let mut x = 0;
        while x + patch_w <= w {
            if let Some(std_dev) = patch_std_dev(gray, opaque, x, y, patch_w, patch_h) {
                total_std += std_dev;
                patches += 1;
            }
            x += patch_w;
        }
        y += patch_h;
    }

    if patches == 0 {
        return TextureStats::default();
    }

    TextureStats {
        score: (total_std / patches as f64 / 255.0).clamp(0.0, 1.0),
        patches,
    }
}

/// Population standard deviation of the opaque pixels in one patch.
fn patch_std_dev(
    gray: &GrayImage,
    opaque: &BitGrid,
    x0: u32,
    y0: u32,
    patch_w: u32,
    patch_h: u32,
) -> Option<f64> {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for y in y0..y0 + patch_h {
        for x in x0..x0 + patch_w {
            if !opaque.get(opaque.index(x, y)) {
                continue;
            }
            let val = gray.get_pixel(x, y).0[0] as f64;
            sum += val;
            sum_sq += val * val;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64) - (mean * mean);
    Some(variance.max(0.0).sqrt())
}
