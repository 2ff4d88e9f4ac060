//! Offline backend: a local LM Studio server speaking the OpenAI chat-completions protocol.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{truncate_body, BackendError, BackendResult, InferenceBackend};
use crate::config::OfflineConfig;

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: i32,
    stream: bool,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LmStudioBackend {
    client: Client,
    config: OfflineConfig,
    timeout: Duration,
}

impl LmStudioBackend {
    pub fn new(config: OfflineConfig, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Http)?;

        Ok(Self { client, config, timeout })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: self.config.model.as_deref(),
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }
}

fn extract_text(response: ChatResponse) -> BackendResult<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::MalformedResponse("no choices returned".to_string()))?
        .message
        .content
        .unwrap_or_default();

    Ok(content)
}

#[async_trait]
impl InferenceBackend for LmStudioBackend {
    fn name(&self) -> &'static str {
        "lm-studio"
    }

    async fn complete(&self, prompt: &str) -> BackendResult<String> {
        debug!("Sending {} char prompt to {}", prompt.len(), self.config.url);

        let response = self
            .client
            .post(&self.config.url)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| BackendError::from_transport(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::from_transport(e, self.timeout))?;

        extract_text(body)
    }
}
