use bytes::Bytes;
use serde::Serialize;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Raw, undecoded image file as handed over by the caller.
///
/// Immutable once built; the pipeline consumes it once.
#[derive(Debug, Clone)]
pub struct ImageSource {
    data: Bytes,
    content_type: String,
    filename: Option<String>,
}

impl ImageSource {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            filename: None,
        }
    }

    /// Attach the original filename (used to derive the upload filename)
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Declared MIME type, exactly as supplied
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Size in MiB, the unit used by the upload size limit
    pub fn size_mb(&self) -> f64 {
        self.data.len() as f64 / BYTES_PER_MIB
    }
}

/// Width/height pair, both sides at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Build a pair, clamping zero sides up to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Same pair with width and height exchanged
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn fits_within(&self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Final pipeline output. Ownership of `data` passes to the caller.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Bytes,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    /// Quality (0-1) of the accepted encode attempt
    pub quality: f32,
    /// Number of encode attempts made by the quality search
    pub attempts: u32,
}

impl EncodedImage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
