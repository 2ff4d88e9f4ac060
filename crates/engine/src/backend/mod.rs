//! Inference backends.
//!
//! Both variants expose the same `complete(prompt) -> text` operation and
//! report failures as [`BackendError`] values. Turning a failure into answer
//! text is the fallback controller's job, not the backend's.

pub mod offline;
pub mod online;

#[cfg(test)]
pub(crate) mod canned;

use async_trait::async_trait;
use thiserror::Error;

pub use offline::LmStudioBackend;
pub use online::GeminiBackend;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Could not reach the server at all.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("quota or rate limit exceeded: {0}")]
    Quota(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error("backend not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
}

impl BackendError {
    /// Map a transport error, keeping connection and timeout failures distinct.
    ///
    /// The request URL is dropped so credentials in it never reach the logs.
    pub fn from_transport(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            BackendError::Timeout(timeout)
        } else if err.is_connect() {
            BackendError::Connect(err.to_string())
        } else if err.is_decode() {
            BackendError::MalformedResponse(err.to_string())
        } else {
            BackendError::Http(err)
        }
    }

    /// The server could not be reached, as opposed to answering badly.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, BackendError::Connect(_) | BackendError::Timeout(_))
    }
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> BackendResult<String>;

    /// One-time reachability check made before the server accepts requests.
    async fn probe(&self) -> BackendResult<()> {
        Ok(())
    }
}

/// Cap error bodies so a stray HTML page does not flood the logs.
pub(crate) fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 300;
    if body.chars().count() > LIMIT {
        let head: String = body.chars().take(LIMIT).collect();
        format!("{}... ({} chars total)", head, body.chars().count())
    } else {
        body.to_string()
    }
}
