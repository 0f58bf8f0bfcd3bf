//! Blur-gated image description pipeline.
//!
//! Takes an image as uploaded bytes or a remote URL, scores its sharpness
//! with a variance-of-Laplacian metric, and only when the image is sharp
//! forwards a downsized copy to a multimodal provider for a textual
//! description. Blurred images short-circuit the pipeline.

pub mod acquire;
pub mod app;
pub mod describe;
pub mod error;
pub mod mime;
pub mod models;
pub mod reduce;
pub mod sharpness;

pub use app::Analyzer;
pub use error::{Error, Result};
