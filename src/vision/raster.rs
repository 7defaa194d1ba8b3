//! RGBA raster handling: validation, downscale, grayscale, bit grids.

use std::borrow::Cow;

use image::imageops::FilterType;
use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use tracing::debug;

use super::VisionError;

/// Longest edge after downscale. Bounds the cost of every later stage.
pub const MAX_ANALYSIS_DIMENSION: u32 = 300;

/// Pixels with alpha below this are ignored by every stage.
pub const MIN_OPAQUE_ALPHA: u8 = 128;

// ═══════════════════════════════════════════════════════════
// BitGrid
// ═══════════════════════════════════════════════════════════

/// Fixed-size bitset indexed by `y * width + x`.
///
/// Used for opacity masks, edge masks and flood-fill visited sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: u32,
    height: u32,
    words: Vec<u64>,
}

impl BitGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let bits = width as usize * height as usize;
        Self {
            width,
            height,
            words: vec![0; bits.div_ceil(64)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        self.words[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.words[idx / 64] |= 1u64 << (idx % 64);
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

// ═══════════════════════════════════════════════════════════
// Raster
// ═══════════════════════════════════════════════════════════

/// Borrowed or owned RGBA pixels, stride 4, row-major.
#[derive(Debug, Clone)]
pub struct Raster<'a> {
    pixels: Cow<'a, [u8]>,
    width: u32,
    height: u32,
}

impl<'a> Raster<'a> {
    /// Wrap a caller-owned buffer. Extra trailing bytes are ignored.
    pub fn new(pixels: &'a [u8], width: u32, height: u32) -> Result<Self, VisionError> {
        let expected = rgba_len(width, height)?;
        if pixels.len() < expected {
            return Err(VisionError::BufferTooSmall {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels: Cow::Borrowed(&pixels[..expected]),
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Shrink so the longest edge is at most `max_dim`, preserving aspect ratio.
    /// Rasters already within bounds are returned untouched. A `max_dim` of 0
    /// is treated as 1.
    pub fn downscaled(self, max_dim: u32) -> Raster<'a> {
        let max_dim = max_dim.max(1);
        let (w, h) = (self.width, self.height);
        let largest = w.max(h);
        if largest <= max_dim {
            return self;
        }

        let scale = max_dim as f32 / largest as f32;
        let new_w = ((w as f32 * scale).round() as u32).clamp(1, max_dim);
        let new_h = ((h as f32 * scale).round() as u32).clamp(1, max_dim);

        if let Some(view) = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(w, h, &self.pixels[..]) {
            debug!(
                from = format!("{w}x{h}"),
                to = format!("{new_w}x{new_h}"),
                "Downscaling image for analysis"
            );
            let resized = image::imageops::resize(&view, new_w, new_h, FilterType::Triangle);
            return Raster::from(resized);
        }
        self
    }

    /// Pixels with alpha >= 128.
    pub fn opacity_mask(&self) -> BitGrid {
        let mut mask = BitGrid::new(self.width, self.height);
        for (idx, px) in self.pixels.chunks_exact(4).enumerate() {
            if px[3] >= MIN_OPAQUE_ALPHA {
                mask.set(idx);
            }
        }
        mask
    }

    /// ITU-R BT.601 luma, rounded to the nearest integer.
    pub fn grayscale(&self) -> GrayImage {
        let mut gray = GrayImage::new(self.width, self.height);
        for (px, out) in self.pixels.chunks_exact(4).zip(gray.pixels_mut()) {
            let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            *out = Luma([luma.round().min(255.0) as u8]);
        }
        gray
    }
}

impl From<RgbaImage> for Raster<'static> {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Raster {
            pixels: Cow::Owned(img.into_raw()),
            width,
            height,
        }
    }
}

/// Byte length of a `width x height` RGBA buffer; errors on zero area.
fn rgba_len(width: u32, height: u32) -> Result<usize, VisionError> {
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyImage { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| VisionError::ImageProcessing(format!("{width}x{height} overflows")))
}
