use image::RgbaImage;
use photoprep_core::Dimensions;

/// EXIF orientation tag values (TIFF tag 0x0112).
///
/// Describes how the stored pixels must be transformed for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Orientation {
    /// No transform needed
    #[default]
    Normal = 1,
    /// Mirror across the vertical axis
    FlipHorizontal = 2,
    /// Rotate 180 degrees
    Rotate180 = 3,
    /// Mirror across the horizontal axis
    FlipVertical = 4,
    /// Mirror across the main diagonal
    Transpose = 5,
    /// Rotate 90 degrees clockwise
    Rotate90 = 6,
    /// Mirror across the anti-diagonal
    Transverse = 7,
    /// Rotate 90 degrees counter-clockwise
    Rotate270 = 8,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Self::Normal,
        Self::FlipHorizontal,
        Self::Rotate180,
        Self::FlipVertical,
        Self::Transpose,
        Self::Rotate90,
        Self::Transverse,
        Self::Rotate270,
    ];

    /// Map an EXIF value; anything outside 1-8 is `Normal`.
    pub fn from_exif(value: u16) -> Self {
        match value {
            1 => Self::Normal,
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    pub fn exif_value(self) -> u16 {
        self as u16
    }

    /// True for the four 90-degree-class orientations (5-8)
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    /// Orientation that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate270 => Self::Rotate90,
            other => other,
        }
    }

    /// Final canvas size for a planned (pre-orientation) size
    pub fn canvas_size(self, planned: Dimensions) -> Dimensions {
        if self.swaps_dimensions() {
            planned.swapped()
        } else {
            planned
        }
    }
}

/// 2-D affine map in canvas convention:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Inverse map, `None` when the linear part is singular
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 {
            return None;
        }

        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        let e = -(a * self.e + c * self.f);
        let f = -(b * self.e + d * self.f);
        Some(Self::new(a, b, c, d, e, f))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Image orientation operations
pub struct ImageOrientation;

impl ImageOrientation {
    /// Transform that draws a `width` x `height` source frame upright, plus
    /// the output canvas size.
    pub fn transform_for(
        orientation: Orientation,
        width: u32,
        height: u32,
    ) -> (AffineTransform, u32, u32) {
        let (w, h) = (width as f64, height as f64);

        let transform = match orientation {
            Orientation::Normal => AffineTransform::IDENTITY,
            Orientation::FlipHorizontal => AffineTransform::new(-1.0, 0.0, 0.0, 1.0, w, 0.0),
            Orientation::Rotate180 => AffineTransform::new(-1.0, 0.0, 0.0, -1.0, w, h),
            Orientation::FlipVertical => AffineTransform::new(1.0, 0.0, 0.0, -1.0, 0.0, h),
            Orientation::Transpose => AffineTransform::new(0.0, 1.0, 1.0, 0.0, 0.0, 0.0),
            Orientation::Rotate90 => AffineTransform::new(0.0, 1.0, -1.0, 0.0, h, 0.0),
            Orientation::Transverse => AffineTransform::new(0.0, -1.0, -1.0, 0.0, h, w),
            Orientation::Rotate270 => AffineTransform::new(0.0, -1.0, 1.0, 0.0, 0.0, w),
        };

        if orientation.swaps_dimensions() {
            (transform, height, width)
        } else {
            (transform, width, height)
        }
    }

    /// Draw `source` onto a fresh canvas with the orientation applied
    pub fn render(source: &RgbaImage, orientation: Orientation) -> RgbaImage {
        let (width, height) = source.dimensions();
        let (transform, out_width, out_height) = Self::transform_for(orientation, width, height);

        tracing::debug!(
            orientation = orientation.exif_value(),
            source_width = width,
            source_height = height,
            canvas_width = out_width,
            canvas_height = out_height,
            "Applying EXIF orientation"
        );

        Self::render_with(source, &transform, out_width, out_height)
    }

    /// Map every source pixel centre through `transform` onto a
    /// `width` x `height` canvas. Pixels landing outside are dropped.
    pub fn render_with(
        source: &RgbaImage,
        transform: &AffineTransform,
        width: u32,
        height: u32,
    ) -> RgbaImage {
        if transform.is_identity() && source.dimensions() == (width, height) {
            return source.clone();
        }

        let mut canvas = RgbaImage::new(width, height);

        for (x, y, pixel) in source.enumerate_pixels() {
            let (dx, dy) = transform.apply(x as f64 + 0.5, y as f64 + 0.5);
            let (dx, dy) = (dx.floor(), dy.floor());
            if dx < 0.0 || dy < 0.0 || dx >= width as f64 || dy >= height as f64 {
                continue;
            }
            canvas.put_pixel(dx as u32, dy as u32, *pixel);
        }

        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{imageops, Rgba};

    /// Non-square image where every pixel is unique
    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 40) as u8, (y * 40) as u8, (x + y * width) as u8, 255])
        })
    }

    #[test]
    fn test_from_exif_invalid() {
        assert_eq!(Orientation::from_exif(0), Orientation::Normal);
        assert_eq!(Orientation::from_exif(9), Orientation::Normal);
        assert_eq!(Orientation::from_exif(255), Orientation::Normal);
    }

    #[test]
    fn test_exif_values_round_trip() {
        for (index, orientation) in Orientation::ALL.iter().enumerate() {
            assert_eq!(orientation.exif_value(), index as u16 + 1);
            assert_eq!(Orientation::from_exif(orientation.exif_value()), *orientation);
        }
    }

    #[test]
    fn test_swaps_dimensions() {
        let swapping: Vec<u16> = Orientation::ALL
            .iter()
            .filter(|o| o.swaps_dimensions())
            .map(|o| o.exif_value())
            .collect();
        assert_eq!(swapping, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_canvas_size() {
        let planned = Dimensions::new(1200, 900);
        assert_eq!(Orientation::Normal.canvas_size(planned), planned);
        assert_eq!(Orientation::Rotate180.canvas_size(planned), planned);
        assert_eq!(
            Orientation::Rotate90.canvas_size(planned),
            Dimensions::new(900, 1200)
        );
        assert_eq!(
            Orientation::Transverse.canvas_size(planned),
            Dimensions::new(900, 1200)
        );
    }

    #[test]
    fn test_transform_table() {
        let (w, h) = (40.0, 30.0);
        let expected = [
            (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            (-1.0, 0.0, 0.0, 1.0, w, 0.0),
            (-1.0, 0.0, 0.0, -1.0, w, h),
            (1.0, 0.0, 0.0, -1.0, 0.0, h),
            (0.0, 1.0, 1.0, 0.0, 0.0, 0.0),
            (0.0, 1.0, -1.0, 0.0, h, 0.0),
            (0.0, -1.0, -1.0, 0.0, h, w),
            (0.0, -1.0, 1.0, 0.0, 0.0, w),
        ];

        for (orientation, (a, b, c, d, e, f)) in Orientation::ALL.iter().zip(expected) {
            let (transform, out_w, out_h) = ImageOrientation::transform_for(*orientation, 40, 30);
            assert_eq!(transform, AffineTransform::new(a, b, c, d, e, f), "{orientation:?}");
            if orientation.swaps_dimensions() {
                assert_eq!((out_w, out_h), (30, 40));
            } else {
                assert_eq!((out_w, out_h), (40, 30));
            }
        }
    }

    #[test]
    fn test_corners_land_inside_canvas() {
        for orientation in Orientation::ALL {
            let (transform, out_w, out_h) = ImageOrientation::transform_for(orientation, 40, 30);
            for (x, y) in [(0.0, 0.0), (40.0, 0.0), (0.0, 30.0), (40.0, 30.0)] {
                let (dx, dy) = transform.apply(x, y);
                assert!(dx >= 0.0 && dx <= out_w as f64, "{orientation:?} x={dx}");
                assert!(dy >= 0.0 && dy <= out_h as f64, "{orientation:?} y={dy}");
            }
        }
    }

    #[test]
    fn test_inverse_transform_matches_inverse_orientation() {
        for orientation in Orientation::ALL {
            let (forward, out_w, out_h) = ImageOrientation::transform_for(orientation, 40, 30);
            let (backward, back_w, back_h) =
                ImageOrientation::transform_for(orientation.inverse(), out_w, out_h);
            assert_eq!(forward.inverse(), Some(backward), "{orientation:?}");
            assert_eq!((back_w, back_h), (40, 30));
        }
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        let singular = AffineTransform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert_eq!(singular.inverse(), None);
        assert!(AffineTransform::IDENTITY.inverse().unwrap().is_identity());
    }

    #[test]
    fn test_render_matches_imageops() {
        let img = gradient(5, 3);
        let cases = [
            (Orientation::Normal, img.clone()),
            (Orientation::FlipHorizontal, imageops::flip_horizontal(&img)),
            (Orientation::Rotate180, imageops::rotate180(&img)),
            (Orientation::FlipVertical, imageops::flip_vertical(&img)),
            (
                Orientation::Transpose,
                imageops::flip_horizontal(&imageops::rotate90(&img)),
            ),
            (Orientation::Rotate90, imageops::rotate90(&img)),
            (
                Orientation::Transverse,
                imageops::flip_horizontal(&imageops::rotate270(&img)),
            ),
            (Orientation::Rotate270, imageops::rotate270(&img)),
        ];

        for (orientation, expected) in cases {
            let rendered = ImageOrientation::render(&img, orientation);
            assert_eq!(rendered.dimensions(), expected.dimensions(), "{orientation:?}");
            assert_eq!(rendered.as_raw(), expected.as_raw(), "{orientation:?}");
        }
    }

    #[test]
    fn test_render_round_trip() {
        let img = gradient(6, 4);
        for orientation in Orientation::ALL {
            let oriented = ImageOrientation::render(&img, orientation);
            let restored = ImageOrientation::render(&oriented, orientation.inverse());
            assert_eq!(restored.dimensions(), img.dimensions(), "{orientation:?}");
            assert_eq!(restored.as_raw(), img.as_raw(), "{orientation:?}");
        }
    }

    #[test]
    fn test_render_with_inverse_affine_round_trip() {
        let img = gradient(7, 2);
        for orientation in Orientation::ALL {
            let (forward, out_w, out_h) = ImageOrientation::transform_for(orientation, 7, 2);
            let oriented = ImageOrientation::render_with(&img, &forward, out_w, out_h);
            let backward = forward.inverse().unwrap();
            let restored = ImageOrientation::render_with(&oriented, &backward, 7, 2);
            assert_eq!(restored.as_raw(), img.as_raw(), "{orientation:?}");
        }
    }

    #[test]
    fn test_rotation_dimension_changes() {
        let img = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255]));

        let rotated = ImageOrientation::render(&img, Orientation::Rotate90);
        assert_eq!(rotated.dimensions(), (2, 4));

        let rotated = ImageOrientation::render(&img, Orientation::Rotate180);
        assert_eq!(rotated.dimensions(), (4, 2));

        let rotated = ImageOrientation::render(&img, Orientation::Rotate270);
        assert_eq!(rotated.dimensions(), (2, 4));
    }

    #[test]
    fn test_identity_render_copies_source() {
        let img = gradient(5, 3);

        let upright = ImageOrientation::render(&img, Orientation::Normal);
        assert_eq!(upright.as_raw(), img.as_raw());

        // Identity into a different canvas size still goes through the pixel walk
        let cropped = ImageOrientation::render_with(&img, &AffineTransform::IDENTITY, 2, 2);
        assert_eq!(cropped.dimensions(), (2, 2));
        assert_eq!(cropped.get_pixel(1, 1), img.get_pixel(1, 1));
    }
}
