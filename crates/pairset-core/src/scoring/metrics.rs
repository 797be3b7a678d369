//! Grayscale statistics: Laplacian variance, mean and standard deviation.

use image::GrayImage;

use crate::domain::QualityMetrics;

/// Measures blur, brightness and contrast of a grayscale image.
#[must_use]
pub fn measure(image: &GrayImage) -> QualityMetrics {
    let histogram = Histogram::from_luma(image);
    QualityMetrics {
        blur_score: laplacian_variance(image),
        brightness: histogram.mean(),
        contrast: Some(histogram.std_dev()),
    }
}

/// Population variance of the 4-neighbour Laplacian response.
///
/// Kernel `[[0, 1, 0], [1, -4, 1], [0, 1, 0]]`, borders mirrored without
/// repeating the edge pixel (reflect-101). Empty images score 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn laplacian_variance(image: &GrayImage) -> f64 {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let w = i64::from(width);
    let h = i64::from(height);
    let pixels = image.as_raw();
    let at = |x: i64, y: i64| -> i64 {
        let x = reflect_101(x, w);
        let y = reflect_101(y, h);
        i64::from(pixels[(y * w + x) as usize])
    };

    let mut sum: i128 = 0;
    let mut sum_sq: i128 = 0;
    for y in 0..h {
        for x in 0..w {
            let response = at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4 * at(x, y);
            sum += i128::from(response);
            sum_sq += i128::from(response * response);
        }
    }

    // Exact integer numerator; only the final division is floating point.
    let n = i128::from(w * h);
    let numerator = n * sum_sq - sum * sum;
    numerator as f64 / (n * n) as f64
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge.
const fn reflect_101(i: i64, len: i64) -> i64 {
    if len == 1 {
        0
    } else if i < 0 {
        -i
    } else if i >= len {
        2 * len - 2 - i
    } else {
        i
    }
}

/// 256-bin histogram of luminance values.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: [u64; 256],
    total: u64,
}

impl Histogram {
    /// Compute histogram from grayscale image.
    #[must_use]
    pub fn from_luma(image: &GrayImage) -> Self {
        let mut bins = [0u64; 256];
        for pixel in image.pixels() {
            bins[usize::from(pixel.0[0])] += 1;
        }
        let total = bins.iter().sum();
        Self { bins, total }
    }

    /// Returns the total pixel count.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Mean luminance.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: u64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as u64) * count)
            .sum();
        sum as f64 / self.total as f64
    }

    /// Population standard deviation of luminance.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let variance: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let diff = (i as f64) - mean;
                diff * diff * (count as f64)
            })
            .sum::<f64>()
            / (self.total as f64);
        variance.sqrt()
    }
}
