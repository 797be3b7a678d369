//! Decoded image handed to the quality scorer.

use std::path::Path;

use image::GenericImageView;

/// A decoded image and where it came from.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Final path component, the key used to pair front and back scans.
    pub filename: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image, deriving its filename and dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        let path = path.into();
        let filename = Path::new(&path)
            .file_name()
            .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned());
        let (width, height) = image.dimensions();
        Self {
            path,
            filename,
            width,
            height,
            image,
        }
    }

    /// Grayscale view of the image.
    ///
    /// Colour pixels use the BT.601 weights `0.299 R + 0.587 G + 0.114 B`,
    /// rounded, so scores match thresholds calibrated on OpenCV grayscale.
    /// Alpha is dropped. Gray images are only converted to 8 bits.
    #[must_use]
    pub fn to_luma8(&self) -> image::GrayImage {
        use image::DynamicImage as D;

        match &self.image {
            D::ImageLuma8(gray) => gray.clone(),
            D::ImageLumaA8(_) | D::ImageLuma16(_) | D::ImageLumaA16(_) => self.image.to_luma8(),
            other => {
                let rgb = other.to_rgb8();
                image::GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                    let [r, g, b] = rgb.get_pixel(x, y).0;
                    image::Luma([bt601_luma(r, g, b)])
                })
            }
        }
    }
}

/// Fixed-point BT.601 luma with round-half-up.
#[allow(clippy::cast_possible_truncation)]
fn bt601_luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    // At most 255 after the division.
    ((weighted + 500) / 1000) as u8
}
