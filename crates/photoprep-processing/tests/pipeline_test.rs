mod helpers;

use helpers::fixtures::{is_bluish, is_reddish, jpeg_with_orientation, png_bytes, split_image};
use image::GenericImageView;
use photoprep_core::{Dimensions, ErrorMetadata, ImageSource, ProcessingOptions};
use photoprep_processing::{
    AdaptiveEncoder, ImageProcessor, Orientation, ProcessingError, ProcessingPipeline,
    ValidationError,
};

fn bounded(max_width: u32, max_height: u32) -> ProcessingOptions {
    ProcessingOptions {
        max_width,
        max_height,
        ..ProcessingOptions::default()
    }
}

#[tokio::test]
async fn test_upright_jpeg_keeps_layout() {
    let data = jpeg_with_orientation(&split_image(400, 300), 1);
    let source = ImageSource::new(data, "image/jpeg");
    let pipeline = ProcessingPipeline::new(bounded(120, 160));

    let encoded = pipeline.process(&source).await.unwrap();
    assert_eq!(encoded.dimensions(), Dimensions::new(120, 90));
    assert_eq!(encoded.content_type, "image/webp");

    let decoded = image::load_from_memory(&encoded.data).unwrap();
    assert_eq!(decoded.dimensions(), (120, 90));
    assert!(is_reddish(&decoded.get_pixel(15, 45)));
    assert!(is_bluish(&decoded.get_pixel(105, 45)));
}

#[tokio::test]
async fn test_rotate90_swaps_canvas() {
    let data = jpeg_with_orientation(&split_image(400, 300), 6);
    assert_eq!(ImageProcessor::read_exif_orientation(&data), Orientation::Rotate90);

    let source = ImageSource::new(data, "image/jpeg");
    let pipeline = ProcessingPipeline::new(bounded(120, 160));

    let encoded = pipeline.process(&source).await.unwrap();
    assert_eq!((encoded.width, encoded.height), (90, 120));

    // Left half of the source ends up on top
    let decoded = image::load_from_memory(&encoded.data).unwrap();
    assert_eq!(decoded.dimensions(), (90, 120));
    assert!(is_reddish(&decoded.get_pixel(45, 15)));
    assert!(is_bluish(&decoded.get_pixel(45, 105)));
}

#[tokio::test]
async fn test_rotate270_swaps_canvas() {
    let data = jpeg_with_orientation(&split_image(400, 300), 8);
    let source = ImageSource::new(data, "image/jpeg");
    let pipeline = ProcessingPipeline::new(bounded(120, 160));

    let encoded = pipeline.process(&source).await.unwrap();
    assert_eq!((encoded.width, encoded.height), (90, 120));

    // Left half of the source ends up at the bottom
    let decoded = image::load_from_memory(&encoded.data).unwrap();
    assert!(is_bluish(&decoded.get_pixel(45, 15)));
    assert!(is_reddish(&decoded.get_pixel(45, 105)));
}

#[tokio::test]
async fn test_small_image_not_upscaled() {
    let source = ImageSource::new(png_bytes(64, 48), "image/png");
    let pipeline = ProcessingPipeline::new(ProcessingOptions::default());

    let encoded = pipeline.process(&source).await.unwrap();
    assert_eq!((encoded.width, encoded.height), (64, 48));
    assert_eq!(encoded.attempts, 1);
    assert_eq!(encoded.quality, 0.85);
}

#[tokio::test]
async fn test_second_pass_is_stable() {
    let source = ImageSource::new(png_bytes(2400, 1800), "image/png");
    let pipeline = ProcessingPipeline::new(ProcessingOptions::default());

    let first = pipeline.process(&source).await.unwrap();
    assert_eq!((first.width, first.height), (1200, 900));

    let again = ImageSource::new(first.data.clone(), first.content_type.clone());
    let second = pipeline.process(&again).await.unwrap();
    assert_eq!((second.width, second.height), (1200, 900));
}

#[tokio::test]
async fn test_tight_budget_stops_at_floor() {
    let source = ImageSource::new(png_bytes(200, 150), "image/png");
    let pipeline = ProcessingPipeline::new(ProcessingOptions::default())
        .with_encoder(AdaptiveEncoder::webp().with_byte_budget(1));

    let encoded = pipeline.process(&source).await.unwrap();
    assert_eq!(encoded.attempts, 6);
    assert!((encoded.quality - 0.35).abs() < 1e-6);
    assert!(encoded.size_bytes() > 1);
}

#[tokio::test]
async fn test_validation_errors_surface() {
    let pipeline = ProcessingPipeline::new(ProcessingOptions::default());

    let err = pipeline
        .process(&ImageSource::new(png_bytes(8, 8), "application/pdf"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessingError::Validation(ValidationError::NotAnImage { .. })
    ));

    let err = pipeline
        .process(&ImageSource::new(png_bytes(8, 8), "image/bmp"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");

    let small_limit = ProcessingOptions {
        max_file_size_mb: 0.000_01,
        ..ProcessingOptions::default()
    };
    let err = ProcessingPipeline::new(small_limit)
        .process(&ImageSource::new(png_bytes(8, 8), "image/png"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_undecodable_payload() {
    let pipeline = ProcessingPipeline::new(ProcessingOptions::default());

    let err = pipeline
        .process(&ImageSource::new(b"definitely not a jpeg".to_vec(), "image/jpeg"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessingError::DecodeFailure(_)));
    assert_eq!(err.client_message(), "Failed to load image");

    // Accepted by validation, rejected by the decoder
    let err = pipeline
        .process(&ImageSource::new(vec![0u8; 512], "image/heic"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "DECODE_FAILURE");
}

#[tokio::test]
async fn test_corrupt_exif_falls_back_to_upright() {
    let mut data = jpeg_with_orientation(&split_image(40, 30), 6);
    // Break the "Exif" magic
    data[6] = b'X';

    let source = ImageSource::new(data, "image/jpeg");
    let encoded = ProcessingPipeline::new(ProcessingOptions::default())
        .process(&source)
        .await
        .unwrap();
    assert_eq!((encoded.width, encoded.height), (40, 30));
}
