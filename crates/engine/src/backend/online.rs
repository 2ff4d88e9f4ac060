//! Online backend: Google Gemini `generateContent` over REST.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{truncate_body, BackendError, BackendResult, InferenceBackend};
use crate::config::OnlineConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiBackend {
    /// Fails with `NotConfigured` when no API key is available.
    pub fn new(config: &OnlineConfig, timeout: Duration) -> BackendResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| BackendError::NotConfigured("GEMINI_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    async fn check_status(&self, response: reqwest::Response) -> BackendResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::Quota(truncate_body(&body)));
        }
        Err(BackendError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        })
    }
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

/// Concatenated text of the first candidate.
fn extract_text(response: GenerateResponse) -> BackendResult<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::MalformedResponse("no candidates returned".to_string()))?;

    let Some(content) = candidate.content else {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(BackendError::MalformedResponse(format!(
            "candidate has no content (finish reason: {})",
            reason
        )));
    };

    Ok(content.parts.into_iter().filter_map(|p| p.text).collect())
}

#[async_trait]
impl InferenceBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> BackendResult<String> {
        let url = format!("{}:generateContent", self.model_url());
        debug!("Sending {} char prompt to {}", prompt.len(), self.model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| BackendError::from_transport(e, self.timeout))?;

        let body: GenerateResponse = self
            .check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::from_transport(e, self.timeout))?;

        extract_text(body)
    }

    async fn probe(&self) -> BackendResult<()> {
        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| BackendError::from_transport(e, self.timeout))?;

        self.check_status(response).await.map(|_| ())
    }
}
