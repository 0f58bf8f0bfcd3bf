//! Data models and configuration
//!
//! Defines the request source union, the response shapes handed to the
//! routing layer, and process configuration.

use crate::{Error, Result};
use serde::Serialize;

/// Where the image bytes for a request come from.
///
/// Resolved exactly once at the pipeline entry; uploaded bytes win over a
/// URL when both are present.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Upload(Vec<u8>),
    Remote(String),
}

impl ImageSource {
    pub fn resolve(file: Option<Vec<u8>>, url: Option<String>) -> Result<Self> {
        if let Some(bytes) = file {
            Ok(ImageSource::Upload(bytes))
        } else if let Some(url) = url {
            Ok(ImageSource::Remote(url))
        } else {
            Err(Error::InputMissing)
        }
    }
}

/// Successful analysis outcome, shaped for the routing layer to serialize.
///
/// `result` is the literal string `"Blur"` for blurred images and the
/// provider's description otherwise; `details` only accompanies blur
/// verdicts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Analysis {
    pub fn blurred(score: f64) -> Self {
        Self {
            result: "Blur".to_string(),
            details: Some(format!("Image is blurred (Score: {:.2})", score)),
        }
    }

    pub fn described(description: String) -> Self {
        Self {
            result: description,
            details: None,
        }
    }
}

/// Failure body for the routing layer, paired with [`Error::status_code`].
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub referer: String,
    pub title: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .map_err(|_| Error::Config("OPENROUTER_API_KEY not set".to_string()))?,
            base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai".to_string()),
            model: std::env::var("DESCRIBE_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.0-flash-exp:free".to_string()),
            referer: std::env::var("APP_REFERER")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            title: std::env::var("APP_TITLE").unwrap_or_else(|_| "ImageBlurApp".to_string()),
        })
    }
}
