//! Per-pixel color buckets.
//!
//! Skin tone is checked first and is exclusive: a skin pixel is never also
//! counted as red, dark or green. The remaining buckets are independent, so
//! a pixel can be both red and dark.

use serde::Serialize;

use super::raster::{Raster, MIN_OPAQUE_ALPHA};

/// Color ratios over all opaque pixels. Every ratio is in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColorStats {
    pub skin_ratio: f64,
    pub red_ratio: f64,
    pub bright_red_ratio: f64,
    pub dark_ratio: f64,
    pub green_ratio: f64,
    /// Pixels with alpha >= 128 (the denominator of every ratio).
    pub opaque_pixels: usize,
}

/// Typical skin, or the lighter band of fair skin.
pub fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    let (ri, gi) = (r as i32, g as i32);
    (r > 110 && r < 210 && g > 90 && b > 70 && (ri - gi).abs() < 55)
        || (r > 180 && r < 255 && g > 140 && b > 120)
}

/// Strongly red-dominant pixel (inflammation, rash).
pub fn is_red(r: u8, g: u8, b: u8) -> bool {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    r > 215 && rf > 2.1 * gf && rf > 2.1 * bf && g < 140
}

/// Red pixel saturated enough to suggest a burn.
pub fn is_bright_red(r: u8, g: u8, b: u8) -> bool {
    is_red(r, g, b) && r > 225
}

/// Dark pixel (scab, wound bed, shadow).
pub fn is_dark(r: u8, g: u8, b: u8) -> bool {
    (r as u32 + g as u32 + b as u32) < 300 && r.max(g).max(b) < 105
}

/// Yellow-green pixel (pus).
pub fn is_green(r: u8, g: u8, b: u8) -> bool {
    let (rf, gf) = (r as f64, g as f64);
    g > 170 && gf > 1.3 * rf && b < 130 && r > 150
}

/// Bucket every opaque pixel of the raster.
pub fn analyze_color(raster: &Raster<'_>) -> ColorStats {
    let mut skin = 0usize;
    let mut red = 0usize;
    let mut bright_red = 0usize;
    let mut dark = 0usize;
    let mut green = 0usize;
    let mut opaque = 0usize;

    for px in raster.pixels().chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if a < MIN_OPAQUE_ALPHA {
            continue;
        }
        opaque += 1;

        if is_skin_tone(r, g, b) {
            skin += 1;
            continue;
        }
        if is_red(r, g, b) {
            red += 1;
            if r > 225 {
                bright_red += 1;
            }
        }
        if is_dark(r, g, b) {
            dark += 1;
        }
        if is_green(r, g, b) {
            green += 1;
        }
    }

    if opaque == 0 {
        return ColorStats::default();
    }

    let total = opaque as f64;
    ColorStats {
        skin_ratio: skin as f64 / total,
        red_ratio: red as f64 / total,
        bright_red_ratio: bright_red as f64 / total,
        dark_ratio: dark as f64 / total,
        green_ratio: green as f64 / total,
        opaque_pixels: opaque,
    }
}
