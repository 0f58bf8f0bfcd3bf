//! Pipeline orchestration.
//!
//! Linear per-request flow: acquire, classify, and only for sharp images
//! reduce and describe. A blurred verdict ends the request immediately;
//! any stage failure propagates as-is with no retries.

use crate::acquire::Acquirer;
use crate::describe::{DescribeService, OpenRouterClient};
use crate::models::{Analysis, Config, ImageSource};
use crate::{reduce, sharpness, Result};
use tracing::info;

/// Coordinates acquisition, blur classification, payload reduction, and
/// the description call for one request at a time.
///
/// Holds no mutable state, so a single instance serves concurrent
/// requests.
pub struct Analyzer {
    acquirer: Acquirer,
    describer: Box<dyn DescribeService>,
}

impl Analyzer {
    /// Build an analyzer talking to the real description provider.
    pub fn new(config: &Config) -> Self {
        Self::with_describer(Box::new(OpenRouterClient::new(config)))
    }

    /// Build an analyzer around an injected description service.
    ///
    /// Primarily for tests and harnesses that must not touch the network.
    pub fn with_describer(describer: Box<dyn DescribeService>) -> Self {
        Self {
            acquirer: Acquirer::new(),
            describer,
        }
    }

    /// Analyze one request's input. Uploaded bytes win over a URL;
    /// neither present is a caller error.
    pub async fn analyze(&self, file: Option<Vec<u8>>, url: Option<String>) -> Result<Analysis> {
        let source = ImageSource::resolve(file, url)?;
        self.analyze_source(source).await
    }

    /// Run the pipeline for an already-resolved source.
    pub async fn analyze_source(&self, source: ImageSource) -> Result<Analysis> {
        let bytes = self.acquirer.acquire(source).await?;

        let image = sharpness::decode(&bytes)?;
        let report = sharpness::classify(&image);
        info!(
            "Sharpness score {:.2} -> {}",
            report.score,
            if report.blurred { "blurred" } else { "sharp" }
        );

        if report.blurred {
            return Ok(Analysis::blurred(report.score));
        }

        let payload = reduce::prepare(&image, &bytes)?;
        let description = self.describer.describe(&payload).await?;

        Ok(Analysis::described(description))
    }
}
