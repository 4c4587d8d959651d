//! Image processing module
//!
//! This module provides the pixel-independent planning steps and the
//! rendering step of the ingestion pipeline:
//! - EXIF orientation reading straight from the byte stream (exif)
//! - Decoding and metadata probing (processor)
//! - Target size planning and resampling (resize)
//! - Orientation transforms and canvas rendering (orientation)

pub mod exif;
pub mod orientation;
pub mod processor;
pub mod resize;

pub use orientation::{AffineTransform, ImageOrientation, Orientation};
pub use processor::ImageProcessor;
pub use resize::ImageResize;
