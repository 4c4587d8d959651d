//! WebP encoding with a bounded quality search
//!
//! [`AdaptiveEncoder`] lowers the quality in fixed steps until the encoded
//! output fits the byte budget or the quality floor is reached. Quality is
//! tracked in whole percent so the step sequence is exact.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use image::RgbaImage;
use photoprep_core::EncodedImage;
use tracing::{debug, warn};

use crate::error::ProcessingError;
use crate::traits::ImageEncoder;

/// Output size target: 500 KiB
pub const DEFAULT_BYTE_BUDGET: usize = 500 * 1024;

/// Quality decrement between attempts, in percent
pub const QUALITY_STEP_PERCENT: u32 = 10;

/// No attempt is made below this quality, in percent
pub const QUALITY_FLOOR_PERCENT: u32 = 30;

pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Encode RGBA pixels as lossy WebP at `quality` (0.0-1.0)
pub fn encode_webp(image: &RgbaImage, quality: f32) -> anyhow::Result<Bytes> {
    let encoder = webp::Encoder::from_rgba(image, image.width(), image.height());
    let memory = encoder
        .encode_simple(false, quality * 100.0)
        .map_err(|e| anyhow!("WebP encoding failed: {:?}", e))?;

    Ok(Bytes::copy_from_slice(&memory))
}

/// libwebp-backed encoder; each call runs on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpEncoder;

#[async_trait]
impl ImageEncoder for WebpEncoder {
    async fn encode(&self, image: Arc<RgbaImage>, quality: f32) -> Result<Bytes, anyhow::Error> {
        tokio::task::spawn_blocking(move || encode_webp(&image, quality)).await?
    }

    fn content_type(&self) -> &'static str {
        WEBP_CONTENT_TYPE
    }
}

#[derive(Clone)]
pub struct AdaptiveEncoder {
    encoder: Arc<dyn ImageEncoder>,
    byte_budget: usize,
}

impl AdaptiveEncoder {
    pub fn new(encoder: Arc<dyn ImageEncoder>) -> Self {
        Self {
            encoder,
            byte_budget: DEFAULT_BYTE_BUDGET,
        }
    }

    pub fn webp() -> Self {
        Self::new(Arc::new(WebpEncoder))
    }

    pub fn with_byte_budget(mut self, byte_budget: usize) -> Self {
        self.byte_budget = byte_budget;
        self
    }

    pub fn byte_budget(&self) -> usize {
        self.byte_budget
    }

    /// Encode `canvas`, starting at `quality` and stepping down until the
    /// result fits the budget.
    ///
    /// An oversize result at the floor is still returned. A failed attempt
    /// is logged and the search moves on; only when no attempt produced any
    /// bytes does this return [`ProcessingError::EncodeFailure`].
    pub async fn encode(
        &self,
        canvas: Arc<RgbaImage>,
        quality: f32,
    ) -> Result<EncodedImage, ProcessingError> {
        let (width, height) = canvas.dimensions();
        let mut percent = (quality.clamp(0.0, 1.0) * 100.0).round() as u32;
        let mut attempts = 0u32;
        let mut last_error = None;
        let mut best: Option<(Bytes, u32)> = None;

        loop {
            attempts += 1;
            let attempt_quality = percent as f32 / 100.0;

            match self.encoder.encode(canvas.clone(), attempt_quality).await {
                Ok(data) => {
                    let size = data.len();
                    debug!(
                        quality = attempt_quality,
                        size_bytes = size,
                        budget = self.byte_budget,
                        "Encode attempt"
                    );
                    best = Some((data, percent));
                    if size <= self.byte_budget {
                        break;
                    }
                }
                Err(e) => {
                    warn!(quality = attempt_quality, error = %e, "Encode attempt failed");
                    last_error = Some(e);
                }
            }

            if percent < QUALITY_FLOOR_PERCENT + QUALITY_STEP_PERCENT {
                break;
            }
            percent -= QUALITY_STEP_PERCENT;
        }

        let (data, percent) = best.ok_or_else(|| {
            ProcessingError::EncodeFailure(match last_error {
                Some(e) => format!("{} attempts failed, last error: {}", attempts, e),
                None => format!("{} attempts failed", attempts),
            })
        })?;

        if data.len() > self.byte_budget {
            warn!(
                size_bytes = data.len(),
                budget = self.byte_budget,
                "Quality floor reached above budget"
            );
        }

        Ok(EncodedImage {
            data,
            content_type: self.encoder.content_type().to_string(),
            width,
            height,
            quality: percent as f32 / 100.0,
            attempts,
        })
    }
}
