//! Outbound payload reduction.
//!
//! Oversized payloads are the dominant cause of provider-side failures,
//! so anything wider than the bound is downsampled and re-encoded before
//! it leaves the process. Images already inside the bound are forwarded
//! byte-for-byte. Only sharp images ever reach this stage.

use crate::mime::detect_image_mime;
use crate::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

/// Longest edge allowed to leave the process, in pixels.
pub const MAX_EDGE: u32 = 640;

/// JPEG quality used when a reduced payload is re-encoded.
pub const JPEG_QUALITY: u8 = 70;

/// Encoded image bytes ready for the description provider.
#[derive(Debug, Clone)]
pub struct OutboundImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Bound the payload for transmission.
///
/// Takes both the decoded raster (for dimensions and resampling) and the
/// original encoded bytes, which are reused untouched when no reduction
/// is needed.
pub fn prepare(image: &DynamicImage, original: &[u8]) -> Result<OutboundImage> {
    let (width, height) = (image.width(), image.height());
    let longer_edge = width.max(height);

    if longer_edge <= MAX_EDGE {
        return Ok(OutboundImage {
            bytes: original.to_vec(),
            mime: detect_image_mime(original),
        });
    }

    let scale = f64::from(MAX_EDGE) / f64::from(longer_edge);
    let new_width = scaled_dimension(width, scale);
    let new_height = scaled_dimension(height, scale);

    tracing::debug!(
        "Reducing image from {}x{} to {}x{}",
        width,
        height,
        new_width,
        new_height
    );

    let resized = image
        .resize_exact(new_width, new_height, FilterType::Lanczos3)
        .to_rgb8();

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode_image(&resized)
        .map_err(|e| Error::Reduce(e.to_string()))?;

    Ok(OutboundImage {
        bytes,
        mime: "image/jpeg",
    })
}

fn scaled_dimension(dim: u32, scale: f64) -> u32 {
    ((f64::from(dim) * scale).round() as u32).max(1)
}
