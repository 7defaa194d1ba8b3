//! Low-fidelity classification from sparse color sampling alone.
//!
//! No edge, texture or shape work is done. On clear-cut inputs (plain skin,
//! saturated burn red) it lands on the same condition as the full tree.

use crate::models::ImageCondition;

use super::color::ColorStats;
use super::raster::{Raster, MIN_OPAQUE_ALPHA};

pub const FAST_SKIN_MIN_RATIO: f64 = 0.85;
pub const FAST_RASH_MIN_RED_RATIO: f64 = 0.04;
pub const FAST_WOUND_MIN_DARK_RATIO: f64 = 0.15;
pub const FAST_BURN_MIN_BRIGHT_RED_RATIO: f64 = 0.02;
pub const FAST_ABSCESS_MIN_GREEN_RATIO: f64 = 0.015;

/// Bucket every `stride`-th pixel into exactly one color class.
///
/// Unlike the full pass the buckets form an else-if chain (skin, red, dark,
/// green) with looser predicates. Ratios are over the sampled opaque pixels.
pub fn sample_color(raster: &Raster<'_>, stride: usize) -> ColorStats {
    let stride = stride.max(1);
    let mut skin = 0usize;
    let mut red = 0usize;
    let mut bright_red = 0usize;
    let mut dark = 0usize;
    let mut green = 0usize;
    let mut sampled = 0usize;

    for px in raster.pixels().chunks_exact(4).step_by(stride) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if a < MIN_OPAQUE_ALPHA {
            continue;
        }
        sampled += 1;

        let (ri, gi, bi) = (r as u32, g as u32, b as u32);
        if r > 110 && r < 210 && g > 90 && b > 70 && (ri as i32 - gi as i32).abs() < 55 {
            skin += 1;
        } else if r > 215 && ri > 2 * gi && ri > 2 * bi {
            red += 1;
            if r > 225 {
                bright_red += 1;
            }
        } else if ri + gi + bi < 300 {
            dark += 1;
        } else if g > 170 && g as f64 > 1.3 * r as f64 {
            green += 1;
        }
    }

    if sampled == 0 {
        return ColorStats::default();
    }

    let total = sampled as f64;
    ColorStats {
        skin_ratio: skin as f64 / total,
        red_ratio: red as f64 / total,
        bright_red_ratio: bright_red as f64 / total,
        dark_ratio: dark as f64 / total,
        green_ratio: green as f64 / total,
        opaque_pixels: sampled,
    }
}

/// Fast rule set over sampled color ratios.
pub fn fast_decide(stats: &ColorStats) -> ImageCondition {
    if stats.skin_ratio > FAST_SKIN_MIN_RATIO {
        if stats.red_ratio > FAST_RASH_MIN_RED_RATIO {
            return ImageCondition::Rash;
        }
        if stats.dark_ratio > FAST_WOUND_MIN_DARK_RATIO {
            return ImageCondition::Wound;
        }
        return ImageCondition::HealthySkin;
    }
    if stats.bright_red_ratio > FAST_BURN_MIN_BRIGHT_RED_RATIO {
        return ImageCondition::Burn;
    }
    if stats.green_ratio > FAST_ABSCESS_MIN_GREEN_RATIO {
        return ImageCondition::Abscess;
    }
    ImageCondition::MildIssue
}
