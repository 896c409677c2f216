//! OpenAI-compatible chat-completions adapter

use super::{ChatGateway, GatewayConfig};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest error-body excerpt carried into a gateway error
const BODY_EXCERPT_LIMIT: usize = 200;

/// Gateway to any endpoint speaking the OpenAI chat-completions protocol
pub struct OpenAiGateway {
    config: GatewayConfig,
    client: Client,
}

impl OpenAiGateway {
    /// Build a gateway over a validated configuration.
    ///
    /// The client carries no timeout and performs no retries; each request
    /// runs until the transport resolves it.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(AppError::Http)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChatGateway for OpenAiGateway {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(BODY_EXCERPT_LIMIT).collect();
            return Err(AppError::Gateway {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = extract_content(completion)?;
        debug!("completion length {}", content.len());
        Ok(content)
    }
}

/// Text of the first completion choice, if the endpoint returned one.
fn extract_content(completion: ChatCompletionResponse) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .ok_or(AppError::EmptyResponse)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
