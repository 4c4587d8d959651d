//! Build an [`ImageSource`] from a file on disk

use std::path::Path;

use anyhow::Context;
use photoprep_core::ImageSource;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// MIME type guessed from a file extension
pub fn content_type_from_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(content_type)
}

/// Declared type for `data`: magic bytes first, then the extension
pub fn detect_content_type(data: &[u8], path: &Path) -> String {
    infer::get(data)
        .map(|kind| kind.mime_type())
        .or_else(|| content_type_from_extension(path))
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

/// Read a file into an [`ImageSource`], carrying its file name along
pub async fn load_source(path: impl AsRef<Path>) -> anyhow::Result<ImageSource> {
    let path = path.as_ref();
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let content_type = detect_content_type(&data, path);
    tracing::debug!(
        path = %path.display(),
        content_type = %content_type,
        size_bytes = data.len(),
        "Loaded source file"
    );

    let source = ImageSource::new(data, content_type);
    Ok(match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => source.with_filename(name),
        None => source,
    })
}
