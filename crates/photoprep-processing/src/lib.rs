//! Photoprep Processing Library
//!
//! This crate turns user-supplied photos into upright, size-bounded WebP
//! images ready for upload.

pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod traits;

pub mod compression;
pub mod image;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use compression::{AdaptiveEncoder, WebpEncoder, DEFAULT_BYTE_BUDGET};
pub use error::ProcessingError;
pub use crate::image::{
    AffineTransform, ImageOrientation, ImageProcessor, ImageResize, Orientation,
};
pub use metadata::ImageMetadata;
pub use pipeline::{ImagePlan, ProcessingPipeline};
pub use traits::ImageEncoder;
pub use upload::{load_source, webp_filename};
pub use validator::{validate, ImageValidator, ValidationError};
