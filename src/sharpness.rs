//! Sharpness classification.
//!
//! Scores an image by the variance of its Laplacian response. Blurred
//! images carry little high-frequency energy, so the second-derivative
//! filter output has low variance. The verdict gates the rest of the
//! pipeline: a blurred image never reaches the description provider.

use crate::{Error, Result};
use image::{DynamicImage, GrayImage};

/// Images scoring below this Laplacian variance are treated as blurred.
/// Empirical constant; changing it changes every verdict.
pub const SHARPNESS_THRESHOLD: f64 = 100.0;

/// Score and verdict for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpnessReport {
    pub score: f64,
    pub blurred: bool,
}

/// Decode encoded image bytes into a raster.
///
/// Empty, truncated, or non-image buffers fail here; nothing downstream
/// ever sees a partially decoded raster.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::Decode(e.to_string()))
}

/// Classify a decoded raster against the fixed threshold.
pub fn classify(image: &DynamicImage) -> SharpnessReport {
    let score = laplacian_variance(&image.to_luma8());
    SharpnessReport {
        score,
        blurred: score < SHARPNESS_THRESHOLD,
    }
}

/// Variance of the 4-neighbor Laplacian over the full grayscale grid.
///
/// Kernel: [[0, 1, 0], [1, -4, 1], [0, 1, 0]]. Borders use reflect-101
/// mirroring so the response grid keeps the input's size. Responses are
/// accumulated in i64; the per-pixel magnitude tops out at 4 * 255, far
/// inside the accumulator range.
fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    // reflect-101: the sample one step past an edge is the pixel one step
    // inside it (for x = 0 the left neighbor is x = 1).
    let reflect = |i: i64, len: u32| -> u32 {
        let last = i64::from(len) - 1;
        let i = i.abs();
        let i = if i > last { 2 * last - i } else { i };
        i.clamp(0, last) as u32
    };

    let sample = |x: i64, y: i64| -> i64 {
        i64::from(gray.get_pixel(reflect(x, width), reflect(y, height)).0[0])
    };

    let mut sum = 0i64;
    let mut sum_sq = 0i64;

    for y in 0..height {
        for x in 0..width {
            let (x, y) = (i64::from(x), i64::from(y));
            let lap = sample(x, y - 1) + sample(x, y + 1) + sample(x - 1, y) + sample(x + 1, y)
                - 4 * sample(x, y);
            sum += lap;
            sum_sq += lap * lap;
        }
    }

    let count = f64::from(width) * f64::from(height);
    let mean = sum as f64 / count;
    // E[X^2] - E[X]^2; clamped because the subtraction can round a
    // uniform image's zero variance microscopically negative.
    (sum_sq as f64 / count - mean * mean).max(0.0)
}
