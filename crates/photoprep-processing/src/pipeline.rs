//! Ingestion pipeline: validate → orient → resize → render → encode.
//!
//! Validation and orientation reading only look at the declared type, the
//! byte length and the first 64 KiB. Decoding, resampling and rendering run
//! together on the blocking pool; the quality search follows on the async
//! side.

use std::sync::Arc;

use image::{GenericImageView, RgbaImage};
use photoprep_core::{Dimensions, EncodedImage, ImageSource, ProcessingOptions};
use serde::Serialize;
use tracing::{debug, info};

use crate::compression::AdaptiveEncoder;
use crate::error::ProcessingError;
use crate::image::{ImageOrientation, ImageProcessor, ImageResize, Orientation};
use crate::metadata::ImageMetadata;
use crate::upload::webp_filename;
use crate::validator::ImageValidator;

/// What the pipeline would do with a source, computed without encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePlan {
    pub metadata: ImageMetadata,
    /// Size after resizing, before orientation
    pub planned: Dimensions,
    /// Final output size
    pub canvas: Dimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,
}

#[derive(Clone)]
pub struct ProcessingPipeline {
    options: ProcessingOptions,
    encoder: AdaptiveEncoder,
}

impl ProcessingPipeline {
    pub fn new(options: ProcessingOptions) -> Self {
        Self {
            options,
            encoder: AdaptiveEncoder::webp(),
        }
    }

    pub fn with_encoder(mut self, encoder: AdaptiveEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Turn a raw upload into an upright, bounded WebP image
    #[tracing::instrument(skip_all, fields(content_type = %source.content_type(), size_bytes = source.size_bytes()))]
    pub async fn process(&self, source: &ImageSource) -> Result<EncodedImage, ProcessingError> {
        ImageValidator::new(self.options.max_file_size_mb).validate(source)?;

        let orientation = ImageProcessor::read_exif_orientation(source.data());
        debug!(orientation = orientation.exif_value(), "Read EXIF orientation");

        let data = source.data().clone();
        let options = self.options;
        // Decode and resample are CPU-bound; keep them off the async workers
        let canvas =
            tokio::task::spawn_blocking(move || prepare_canvas(&data, orientation, &options))
                .await
                .map_err(|e| ProcessingError::DecodeFailure(format!("decode task failed: {}", e)))??;

        let encoded = self
            .encoder
            .encode(Arc::new(canvas), self.options.quality)
            .await?;

        info!(
            width = encoded.width,
            height = encoded.height,
            size_bytes = encoded.size_bytes(),
            quality = encoded.quality,
            attempts = encoded.attempts,
            "Image processed"
        );

        Ok(encoded)
    }

    /// Validate and plan without decoding pixels or encoding
    pub fn inspect(&self, source: &ImageSource) -> Result<ImagePlan, ProcessingError> {
        ImageValidator::new(self.options.max_file_size_mb).validate(source)?;

        let metadata = ImageProcessor::read_metadata(source.data())?;
        let orientation = Orientation::from_exif(u16::from(metadata.exif_orientation));
        let planned = ImageResize::plan_dimensions(
            metadata.width,
            metadata.height,
            self.options.max_width,
            self.options.max_height,
        );

        Ok(ImagePlan {
            metadata,
            planned,
            canvas: orientation.canvas_size(planned),
            output_filename: source.filename().map(webp_filename),
        })
    }
}

/// Decode, resize to the planned size, then render upright
fn prepare_canvas(
    data: &[u8],
    orientation: Orientation,
    options: &ProcessingOptions,
) -> Result<RgbaImage, ProcessingError> {
    let img = ImageProcessor::decode(data)?;
    let (width, height) = img.dimensions();

    let planned =
        ImageResize::plan_dimensions(width, height, options.max_width, options.max_height);
    let resized = ImageResize::resize_image(&img, planned);

    Ok(ImageOrientation::render(&resized.to_rgba8(), orientation))
}
