//! Image acquisition.
//!
//! Normalizes the two request inputs, an uploaded byte stream or a remote
//! URL, into one in-memory buffer. The URL path is the only stage besides
//! the description call that touches the network.

use crate::models::ImageSource;
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// Timeout for fetching a remote image. The description call carries its
/// own, longer timeout; a plain GET has no inference latency.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub struct Acquirer {
    client: Client,
}

impl Acquirer {
    pub fn new() -> Self {
        // Proxies are disabled so a configured system proxy cannot
        // intercept the fetch.
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .no_proxy()
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Produce the raw image bytes for a resolved source.
    ///
    /// Uploaded bytes pass through untouched; remote sources cost one
    /// outbound GET.
    pub async fn acquire(&self, source: ImageSource) -> Result<Vec<u8>> {
        match source {
            ImageSource::Upload(bytes) => Ok(bytes),
            ImageSource::Remote(url) => self.fetch(&url).await,
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching remote image from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Acquisition(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Acquisition(format!(
                "unexpected status {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Acquisition(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

impl Default for Acquirer {
    fn default() -> Self {
        Self::new()
    }
}
