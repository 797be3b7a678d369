//! Synthetic document scans for testing.
//!
//! Every page is 64x64 unless a size is given. Printed pages use a line
//! pattern: two dark rows in every eight, which gives a strong Laplacian
//! response and a wide grayscale spread.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use pairset_core::domain::ImageInfo;

const SIDE: u32 = 64;

/// Builder for synthetic scans with known quality characteristics.
pub struct ScanBuilder;

impl ScanBuilder {
    // === Good under both presets ===

    /// Dark text lines (20) on a light page (230).
    ///
    /// Brightness 177.5, contrast about 90.9, blur score about 20 700.
    #[must_use]
    pub fn document_page(filename: &str) -> ImageInfo {
        Self::lined_page(filename, SIDE, SIDE, 20, 230)
    }

    /// [`Self::document_page`] at a custom size.
    #[must_use]
    pub fn document_page_sized(filename: &str, width: u32, height: u32) -> ImageInfo {
        Self::lined_page(filename, width, height, 20, 230)
    }

    /// Colour version of [`Self::document_page`] with blue ink.
    #[must_use]
    pub fn rgb_document_page(filename: &str) -> ImageInfo {
        let img = RgbImage::from_fn(SIDE, SIDE, |_, y| {
            if y % 8 < 2 {
                Rgb([10, 20, 90])
            } else {
                Rgb([235, 232, 225])
            }
        });
        ImageInfo::new(filename, DynamicImage::ImageRgb8(img))
    }

    // === Poor under the document preset ===

    /// Uniform page with no edges at all (blur score 0).
    #[must_use]
    pub fn blank_page(filename: &str, value: u8) -> ImageInfo {
        let img = GrayImage::from_pixel(SIDE, SIDE, Luma([value]));
        ImageInfo::new(filename, DynamicImage::ImageLuma8(img))
    }

    /// Smooth horizontal ramp from 60 to 186, as left by a defocused lens.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn blurred_page(filename: &str) -> ImageInfo {
        let img = GrayImage::from_fn(SIDE, SIDE, |x, _| Luma([(60 + 2 * x) as u8]));
        ImageInfo::new(filename, DynamicImage::ImageLuma8(img))
    }

    /// Underexposed lined page (0 on 30), brightness 22.5.
    #[must_use]
    pub fn dark_page(filename: &str) -> ImageInfo {
        Self::lined_page(filename, SIDE, SIDE, 0, 30)
    }

    /// Overexposed lined page (240 on 255), brightness 251.25.
    #[must_use]
    pub fn washed_out_page(filename: &str) -> ImageInfo {
        Self::lined_page(filename, SIDE, SIDE, 240, 255)
    }

    /// Faded lined page (120 on 140).
    ///
    /// Sharp and well exposed but contrast is only about 8.7: Poor under the
    /// document preset, Good under strict, which has no contrast gate.
    #[must_use]
    pub fn faded_page(filename: &str) -> ImageInfo {
        Self::lined_page(filename, SIDE, SIDE, 120, 140)
    }

    // === Files on disk ===

    /// Saves `scan` as `dir/<filename>`, encoding by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(scan: &ImageInfo, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(&scan.filename);
        scan.image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Writes bytes that no decoder accepts to `dir/<filename>`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn save_corrupt(filename: &str, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(filename);
        std::fs::write(&path, b"not an image at all")
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    fn lined_page(filename: &str, width: u32, height: u32, ink: u8, paper: u8) -> ImageInfo {
        let img = GrayImage::from_fn(width, height, |_, y| {
            if y % 8 < 2 {
                Luma([ink])
            } else {
                Luma([paper])
            }
        });
        ImageInfo::new(filename, DynamicImage::ImageLuma8(img))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pairset_core::domain::Quality;
    use pairset_core::scoring::{QualityScorer, QualityThresholds};

    fn label(scan: &ImageInfo, thresholds: QualityThresholds) -> Quality {
        QualityScorer::new(thresholds).unwrap().score(scan).quality()
    }

    #[test]
    fn test_document_page_is_good_under_both_presets() {
        let page = ScanBuilder::document_page("a.png");
        assert_eq!(label(&page, QualityThresholds::document()), Quality::Good);
        assert_eq!(label(&page, QualityThresholds::strict()), Quality::Good);
        assert_eq!(
            label(
                &ScanBuilder::rgb_document_page("b.png"),
                QualityThresholds::document()
            ),
            Quality::Good
        );
    }

    #[test]
    fn test_defective_pages_are_poor() {
        for page in [
            ScanBuilder::blank_page("a.png", 128),
            ScanBuilder::blurred_page("b.png"),
            ScanBuilder::dark_page("c.png"),
            ScanBuilder::washed_out_page("d.png"),
            ScanBuilder::faded_page("e.png"),
        ] {
            assert_eq!(
                label(&page, QualityThresholds::document()),
                Quality::Poor,
                "{}",
                page.filename
            );
        }
    }

    #[test]
    fn test_faded_page_passes_strict() {
        let page = ScanBuilder::faded_page("a.png");
        assert_eq!(label(&page, QualityThresholds::strict()), Quality::Good);
    }

    #[test]
    fn test_save_round_trips_through_decoder() {
        let dir = std::env::temp_dir().join(format!("pairset-builders-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = ScanBuilder::save(&ScanBuilder::document_page("page.png"), &dir).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.to_luma8().get_pixel(0, 0).0[0], 20);
        assert_eq!(decoded.to_luma8().get_pixel(0, 2).0[0], 230);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
