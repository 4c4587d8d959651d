//! Data models for the ingestion pipeline
//!
//! Inputs (`ImageSource`), intermediate geometry (`Dimensions`) and the final
//! output (`EncodedImage`) shared between the processing crate and its callers.

mod image;

pub use image::*;
