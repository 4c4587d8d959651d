//! Photoprep Core Library
//!
//! This crate provides the domain models, processing options and error
//! metadata shared by the photoprep pipeline and its front ends.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ProcessingOptions, ProcessingOverrides};
pub use error::{ErrorMetadata, LogLevel};
pub use models::{Dimensions, EncodedImage, ImageSource};
