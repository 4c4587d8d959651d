//! Image processor - decoding and metadata probing

use std::io::Cursor;

use image::{DynamicImage, ImageReader};

use super::exif;
use super::orientation::Orientation;
use crate::error::ProcessingError;
use crate::metadata::ImageMetadata;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode the full pixel payload. The container format is sniffed from
    /// the bytes, not taken from the declared MIME type.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::DecodeFailure(e.to_string()))?;

        if reader.format().is_none() {
            return Err(ProcessingError::DecodeFailure(
                "unrecognized image container".to_string(),
            ));
        }

        reader
            .decode()
            .map_err(|e| ProcessingError::DecodeFailure(e.to_string()))
    }

    /// Read format, dimensions and orientation without decoding pixels
    pub fn read_metadata(data: &[u8]) -> Result<ImageMetadata, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::DecodeFailure(e.to_string()))?;

        let format = reader
            .format()
            .map(|f| format!("{:?}", f))
            .ok_or_else(|| {
                ProcessingError::DecodeFailure("unrecognized image container".to_string())
            })?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ProcessingError::DecodeFailure(e.to_string()))?;

        let orientation = Self::read_exif_orientation(data);

        Ok(ImageMetadata {
            width,
            height,
            format,
            size_bytes: data.len() as u64,
            exif_orientation: orientation.exif_value() as u8,
        })
    }

    /// Read EXIF orientation tag from image data.
    ///
    /// Returns [`Orientation::Normal`] when the tag is absent or unreadable.
    pub fn read_exif_orientation(data: &[u8]) -> Orientation {
        exif::read_orientation(data)
    }
}
