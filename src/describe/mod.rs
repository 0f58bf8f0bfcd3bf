//! Remote image description.
//!
//! The provider is consumed through the [`DescribeService`] capability so
//! the pipeline can be exercised without network access. The real client
//! speaks OpenRouter's chat-completions dialect.

pub mod client;
pub mod mock;
pub mod types;

pub use client::OpenRouterClient;
pub use mock::MockDescribeClient;

use crate::reduce::OutboundImage;
use crate::Result;
use async_trait::async_trait;

/// Instruction sent alongside every image.
pub const DESCRIBE_INSTRUCTION: &str = "Describe this image concisely.";

/// Returned when the provider answers successfully but without any
/// description text. A working provider with an empty answer is a soft
/// degradation, not a failure.
pub const NO_DESCRIPTION: &str = "No description available";

#[async_trait]
pub trait DescribeService: Send + Sync {
    async fn describe(&self, image: &OutboundImage) -> Result<String>;
}
