use photoprep_core::{ErrorMetadata, ImageSource, LogLevel};

/// Subtypes accepted for ingestion. Matched by containment, so
/// `image/x-png` or `image/pjpeg` pass as well.
pub const SUPPORTED_SUBTYPES: &[&str] = &["jpeg", "jpg", "png", "webp", "gif", "heic", "heif"];

/// Validation errors for user-supplied photos
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an image file")]
    NotAnImage { content_type: String },

    #[error("Image too large. Maximum size is {limit_mb}MB")]
    TooLarge { size_bytes: usize, limit_mb: f64 },

    #[error("Unsupported image format. Use JPEG, PNG, WebP, or GIF")]
    UnsupportedFormat { content_type: String },
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NotAnImage { .. } => "NOT_AN_IMAGE",
            ValidationError::TooLarge { .. } => "FILE_TOO_LARGE",
            ValidationError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Image file validator
///
/// Inspects only what the caller already supplied (declared MIME type and
/// byte length); never touches pixel data.
pub struct ImageValidator {
    max_size_mb: f64,
}

impl ImageValidator {
    pub fn new(max_size_mb: f64) -> Self {
        Self { max_size_mb }
    }

    /// Declared type must be in the `image/` family
    pub fn validate_content_family(&self, content_type: &str) -> Result<(), ValidationError> {
        if !content_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Pre-compression size check, in MiB
    pub fn validate_file_size(&self, source: &ImageSource) -> Result<(), ValidationError> {
        if source.size_mb() > self.max_size_mb {
            return Err(ValidationError::TooLarge {
                size_bytes: source.size_bytes(),
                limit_mb: self.max_size_mb,
            });
        }

        Ok(())
    }

    /// Subtype must contain one of [`SUPPORTED_SUBTYPES`], case-insensitively
    pub fn validate_format(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !SUPPORTED_SUBTYPES
            .iter()
            .any(|subtype| normalized.contains(subtype))
        {
            return Err(ValidationError::UnsupportedFormat {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate all aspects of a source, in order: family, size, format
    pub fn validate(&self, source: &ImageSource) -> Result<(), ValidationError> {
        self.validate_content_family(source.content_type())?;
        self.validate_file_size(source)?;
        self.validate_format(source.content_type())?;
        Ok(())
    }
}

/// Validate `source` against a size limit in MiB
pub fn validate(source: &ImageSource, max_size_mb: f64) -> Result<(), ValidationError> {
    ImageValidator::new(max_size_mb).validate(source)
}
