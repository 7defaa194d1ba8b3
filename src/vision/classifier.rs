//! Classifier entry points: raw pixels, decoded images, encoded bytes, files.

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::config::{ClassifierConfig, ClassifierMode};
use crate::models::{DiagnosisRecord, ImageCondition};

use super::color::analyze_color;
use super::decision::{decide, record_for, ImageFeatures};
use super::decode::decode_image;
use super::edges::detect_edges;
use super::fast::{fast_decide, sample_color};
use super::raster::Raster;
use super::shape::analyze_shapes;
use super::texture::analyze_texture;
use super::VisionError;

/// Run every analysis stage over an already-downscaled raster.
pub fn extract_features(raster: &Raster<'_>) -> Result<ImageFeatures, VisionError> {
    let color = analyze_color(raster);
    if color.opaque_pixels == 0 {
        return Err(VisionError::FullyTransparent);
    }

    let gray = raster.grayscale();
    let opaque = raster.opacity_mask();
    let (edge_mask, edges) = detect_edges(&gray, &opaque);
    let texture = analyze_texture(&gray, &opaque);
    let shapes = analyze_shapes(&edge_mask);

    debug!(
        width = raster.width(),
        height = raster.height(),
        skin = color.skin_ratio,
        red = color.red_ratio,
        bright_red = color.bright_red_ratio,
        dark = color.dark_ratio,
        green = color.green_ratio,
        edge_density = edges.edge_density,
        texture = texture.score,
        contours = shapes.contour_count,
        large_smooth = shapes.large_smooth_count,
        "Image features extracted"
    );

    Ok(ImageFeatures {
        color,
        edges,
        texture,
        shapes,
    })
}

/// Heuristic skin-photo classifier.
///
/// Stateless apart from its configuration; cheap to copy into worker tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageClassifier {
    config: ClassifierConfig,
}

impl ImageClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a row-major RGBA buffer (stride 4).
    ///
    /// Never fails: a zero-area image, a short buffer or a fully transparent
    /// image yields the "unable to analyze" record. The input is only read.
    pub fn classify(&self, pixels: &[u8], width: u32, height: u32) -> DiagnosisRecord {
        match self.try_classify(pixels, width, height) {
            Ok(condition) => record_for(condition),
            Err(e) => {
                warn!(width, height, error = %e, "Image could not be analyzed");
                record_for(ImageCondition::Unanalyzable)
            }
        }
    }

    /// Fallible form of [`classify`](Self::classify), returning only the condition.
    pub fn try_classify(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<ImageCondition, VisionError> {
        if self.config.max_dimension == 0 {
            return Err(VisionError::InvalidMaxDimension(0));
        }
        let raster = Raster::new(pixels, width, height)?.downscaled(self.config.max_dimension);

        let condition = match self.config.mode {
            ClassifierMode::Full => decide(&extract_features(&raster)?),
            ClassifierMode::Fast => {
                let stats = sample_color(&raster, self.config.fast_sample_stride);
                if stats.opaque_pixels == 0 {
                    return Err(VisionError::FullyTransparent);
                }
                debug!(
                    skin = stats.skin_ratio,
                    red = stats.red_ratio,
                    bright_red = stats.bright_red_ratio,
                    dark = stats.dark_ratio,
                    green = stats.green_ratio,
                    sampled = stats.opaque_pixels,
                    "Fast color sample"
                );
                fast_decide(&stats)
            }
        };

        debug!(condition = %condition, mode = ?self.config.mode, "Image classified");
        Ok(condition)
    }

    pub fn classify_image(&self, image: &RgbaImage) -> DiagnosisRecord {
        self.classify(image.as_raw(), image.width(), image.height())
    }

    /// Decode then classify. Undecodable bytes yield the "unable to analyze" record.
    pub fn classify_bytes(&self, bytes: &[u8]) -> DiagnosisRecord {
        match decode_image(bytes) {
            Ok(image) => self.classify_image(&image),
            Err(e) => {
                warn!(bytes = bytes.len(), error = %e, "Image decode failed");
                record_for(ImageCondition::Unanalyzable)
            }
        }
    }

    /// Read a photo from disk and classify it on the blocking pool.
    ///
    /// Only a missing or unreadable file is an error; anything readable
    /// produces a record.
    pub async fn classify_file(&self, path: impl AsRef<Path>) -> Result<DiagnosisRecord, VisionError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VisionError::NotFound(path.to_path_buf())
            } else {
                VisionError::Io(e)
            }
        })?;

        let classifier = *self;
        tokio::task::spawn_blocking(move || classifier.classify_bytes(&bytes))
            .await
            .map_err(|e| VisionError::Task(e.to_string()))
    }
}
