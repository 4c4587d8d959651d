use image::{imageops::FilterType, DynamicImage, GenericImageView};
use photoprep_core::Dimensions;

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Plan the pre-orientation target size.
    ///
    /// Width is clamped first, then height on the already width-adjusted
    /// pair. Aspect ratio is preserved up to rounding and the source is never
    /// upscaled.
    pub fn plan_dimensions(
        orig_width: u32,
        orig_height: u32,
        max_width: u32,
        max_height: u32,
    ) -> Dimensions {
        let original = Dimensions::new(orig_width, orig_height);
        if original.fits_within(max_width, max_height) {
            return original;
        }

        let mut width = orig_width;
        let mut height = orig_height;

        if width > max_width {
            height = (height as f64 * max_width as f64 / width as f64).round() as u32;
            width = max_width;
        }

        if height > max_height {
            width = (width as f64 * max_height as f64 / height as f64).round() as u32;
            height = max_height;
        }

        Dimensions::new(width, height)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions; a no-op when the size already matches
    pub fn resize_image(img: &DynamicImage, target: Dimensions) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (target.width(), target.height()) {
            return img.clone();
        }

        let filter = Self::select_filter(orig_width, orig_height, target.width(), target.height());
        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = target.width(),
            to_height = target.height(),
            filter = ?filter,
            "Resizing image"
        );
        img.resize_exact(target.width(), target.height(), filter)
    }
}
