use super::DescribeService;
use crate::reduce::OutboundImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the description provider.
///
/// Records every payload it is handed so tests can assert on what would
/// have crossed the wire, and cycles through configured responses.
/// Clones share state, which lets a test keep a probe handle after the
/// mock is boxed into the pipeline.
#[derive(Clone)]
pub struct MockDescribeClient {
    responses: Arc<Mutex<Vec<String>>>,
    received: Arc<Mutex<Vec<OutboundImage>>>,
    call_count: Arc<Mutex<usize>>,
    fail_status: Arc<Mutex<Option<u16>>>,
}

impl MockDescribeClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            fail_status: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_description_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Make every call fail as if the provider returned this status.
    pub fn with_provider_failure(self, status: u16) -> Self {
        *self.fail_status.lock().unwrap() = Some(status);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Payloads handed to the mock, in call order.
    pub fn received_images(&self) -> Vec<OutboundImage> {
        self.received.lock().unwrap().clone()
    }
}

impl Default for MockDescribeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DescribeService for MockDescribeClient {
    async fn describe(&self, image: &OutboundImage) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.received.lock().unwrap().push(image.clone());

        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(Error::Provider {
                status: Some(status),
                message: "mock provider failure".to_string(),
            });
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            Ok(format!(
                "A {} image of {} bytes",
                image.mime,
                image.bytes.len()
            ))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
