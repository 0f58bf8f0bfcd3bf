//! Error handling and custom error types
//!
//! Provides unified error handling across the pipeline using thiserror.
//! Each variant corresponds to one stage failing; nothing is retried.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No image provided. Send 'url' or 'file'.")]
    InputMissing,

    #[error("Failed to fetch URL: {0}")]
    Acquisition(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to prepare outbound image: {0}")]
    Reduce(String),

    #[error("Description provider error: {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status classification for the routing layer.
    ///
    /// Caller mistakes map to 400, internal processing failures to 500,
    /// and provider failures carry the provider's own status when known.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InputMissing | Error::Acquisition(_) => 400,
            Error::Decode(_) | Error::Reduce(_) | Error::Config(_) => 500,
            Error::Provider { status, .. } => status.unwrap_or(500),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
