//! Heuristic skin-photo classifier.
//!
//! Stages: downscale -> color buckets -> Sobel edges -> patch texture ->
//! contour shapes -> ordered decision tree. Every stage is a pure function
//! over a borrowed raster, so concurrent classifications share nothing.

pub mod raster;
pub mod color;
pub mod edges;
pub mod texture;
pub mod shape;
pub mod decision;
pub mod fast;
pub mod decode;
pub mod classifier;

pub use raster::*;
pub use color::*;
pub use edges::*;
pub use texture::*;
pub use shape::*;
pub use decision::*;
pub use decode::*;
pub use classifier::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, {expected} required for {width}x{height} RGBA")]
    BufferTooSmall {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Image has no opaque pixels")]
    FullyTransparent,

    #[error("Analysis size must be at least 1 pixel, got {0}")]
    InvalidMaxDimension(u32),

    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    #[error("Classification task failed: {0}")]
    Task(String),
}
