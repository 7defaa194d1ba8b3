//! Encoded photo bytes to an RGBA raster.

use std::io::Cursor;
use std::ops::RangeInclusive;

use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::debug;

use super::VisionError;

const MIB: usize = 1024 * 1024;

/// Accepted upload size. The floor is a 1x1 PNG; the ceiling is well above
/// any phone camera JPEG.
const PHOTO_BYTES: RangeInclusive<usize> = 67..=50 * MIB;

/// Decode PNG/JPEG/TIFF bytes, turn the photo upright, convert to RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, VisionError> {
    check_photo_size(bytes)?;

    let img = image::load_from_memory(bytes)
        .map_err(|e| VisionError::ImageProcessing(format!("Failed to decode photo: {e}")))?;

    let orientation = exif_orientation(bytes);
    let img = apply_orientation(img, orientation);
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyImage { width, height });
    }

    debug!(width, height, orientation, "Decoded photo");
    Ok(img.to_rgba8())
}

/// Size gate run before the decoder sees the upload.
pub fn check_photo_size(bytes: &[u8]) -> Result<(), VisionError> {
    let len = bytes.len();
    if len < *PHOTO_BYTES.start() {
        return Err(VisionError::ImageProcessing(format!(
            "Photo is {len} bytes, too small to hold an image"
        )));
    }
    if len > *PHOTO_BYTES.end() {
        return Err(VisionError::ImageProcessing(format!(
            "Photo is larger than the {} MB upload limit",
            PHOTO_BYTES.end() / MIB
        )));
    }
    Ok(())
}

/// Camera orientation recorded in the photo's EXIF block. Photos without
/// one (screenshots, most PNGs) count as upright (1).
pub fn exif_orientation(bytes: &[u8]) -> u32 {
    exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .filter(|o| (1..=8).contains(o))
        .unwrap_or(1)
}

/// Clockwise quarter turns, then whether to mirror left-right.
fn orientation_steps(orientation: u32) -> (u8, bool) {
    match orientation {
        2 => (0, true),
        3 => (2, false),
        4 => (2, true),
        5 => (1, true),
        6 => (1, false),
        7 => (3, true),
        8 => (3, false),
        _ => (0, false),
    }
}

/// Undo the camera orientation so the skin region is analyzed as seen.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    let (turns, mirror) = orientation_steps(orientation);
    let img = match turns {
        1 => img.rotate90(),
        2 => img.rotate180(),
        3 => img.rotate270(),
        _ => img,
    };
    if mirror {
        img.fliph()
    } else {
        img
    }
}
