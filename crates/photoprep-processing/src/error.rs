//! Errors reported to the caller of the pipeline
//!
//! EXIF problems never show up here: orientation reading falls back to
//! `Orientation::Normal` instead of failing.

use photoprep_core::{ErrorMetadata, LogLevel};

use crate::validator::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to load image: {0}")]
    DecodeFailure(String),

    #[error("Failed to compress image: {0}")]
    EncodeFailure(String),
}

impl ErrorMetadata for ProcessingError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessingError::Validation(err) => err.error_code(),
            ProcessingError::DecodeFailure(_) => "DECODE_FAILURE",
            ProcessingError::EncodeFailure(_) => "ENCODE_FAILURE",
        }
    }

    fn client_message(&self) -> String {
        match self {
            ProcessingError::Validation(err) => err.client_message(),
            ProcessingError::DecodeFailure(_) => "Failed to load image".to_string(),
            ProcessingError::EncodeFailure(_) => "Failed to compress image".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ProcessingError::Validation(err) => err.log_level(),
            ProcessingError::DecodeFailure(_) => LogLevel::Warn,
            ProcessingError::EncodeFailure(_) => LogLevel::Error,
        }
    }
}
