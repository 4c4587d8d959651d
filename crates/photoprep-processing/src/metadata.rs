//! Image metadata types

use serde::Serialize;

/// Source image metadata, read without decoding pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: u64,
    /// EXIF orientation (1-8, 1 when absent)
    pub exif_orientation: u8,
}
