use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent, ImageUrl,
    MessagePart,
};
use super::{DescribeService, DESCRIBE_INSTRUCTION, NO_DESCRIPTION};
use crate::models::Config;
use crate::reduce::OutboundImage;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;

const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// Timeout for one description round trip. Multimodal inference is slow,
/// so this is wider than the acquisition timeout.
const DESCRIBE_TIMEOUT: Duration = Duration::from_secs(45);

pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> Self {
        // Same no-proxy stance as acquisition: nothing sits between this
        // process and the provider.
        let client = Client::builder()
            .timeout(DESCRIBE_TIMEOUT)
            .no_proxy()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        }
    }

    fn build_request(&self, image: &OutboundImage) -> ChatCompletionRequest {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let data_url = format!("data:{};base64,{}", image.mime, encoded);

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(ChatMessageContent::Parts(vec![
                    MessagePart {
                        part_type: "text".to_string(),
                        text: Some(DESCRIBE_INSTRUCTION.to_string()),
                        image_url: None,
                    },
                    MessagePart {
                        part_type: "image_url".to_string(),
                        text: None,
                        image_url: Some(ImageUrl { url: data_url }),
                    },
                ])),
            }],
        }
    }
}

#[async_trait]
impl DescribeService for OpenRouterClient {
    async fn describe(&self, image: &OutboundImage) -> Result<String> {
        tracing::debug!(
            "Requesting description for image ({} bytes, {})",
            image.bytes.len(),
            image.mime
        );

        let request = self.build_request(image);
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            // OpenRouter requires these for free-tier routing attribution.
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach description provider: {}", e);
                Error::Provider {
                    status: None,
                    message: e.to_string(),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Provider error (status {}): {}", status, body);
            return Err(Error::Provider {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| Error::Provider {
            status: None,
            message: e.to_string(),
        })?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse provider response: {}\nBody: {}", e, body);
            Error::Provider {
                status: None,
                message: format!("unparsable response: {}", e),
            }
        })?;

        let description = parsed
            .choices
            .first()
            .and_then(|choice| match &choice.message.content {
                Some(ChatMessageContent::Text(text)) => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| {
                tracing::warn!("Provider response carried no description text");
                NO_DESCRIPTION.to_string()
            });

        Ok(description)
    }
}
