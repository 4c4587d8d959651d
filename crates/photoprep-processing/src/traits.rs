//! Core traits for photo encoding
//!
//! The adaptive quality search is written against [`ImageEncoder`] so the
//! WebP backend can be swapped or scripted in tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::RgbaImage;

/// Single-shot lossy encoder
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    /// Encode `image` once at `quality` (0.0-1.0)
    async fn encode(&self, image: Arc<RgbaImage>, quality: f32) -> Result<Bytes, anyhow::Error>;

    /// MIME type of the produced bytes
    fn content_type(&self) -> &'static str;
}
