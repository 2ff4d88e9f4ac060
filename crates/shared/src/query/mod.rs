// crates/shared/src/query/mod.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query not provided")]
    Empty,
}

/// A user's question. Never blank once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Result<Self, QueryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Which inference path produced the final answer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMode {
    #[serde(rename = "ONLINE (Gemini)")]
    Online,
    /// Online was attempted for this request and failed.
    #[serde(rename = "OFFLINE (LM Studio Fallback)")]
    OfflineFallback,
    /// Online was never available to this process.
    #[serde(rename = "OFFLINE (LM Studio)")]
    Offline,
}

impl BackendMode {
    pub fn label(&self) -> &'static str {
        match self {
            BackendMode::Online => "ONLINE (Gemini)",
            BackendMode::OfflineFallback => "OFFLINE (LM Studio Fallback)",
            BackendMode::Offline => "OFFLINE (LM Studio)",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Query endpoint
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// The outward-facing result of one dispatch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DispatchResult {
    pub mode: BackendMode,
    #[serde(rename = "user_query")]
    pub query: String,
    #[serde(rename = "ai_response")]
    pub answer: String,
}

impl DispatchResult {
    pub fn assemble(mode: BackendMode, query: &Query, answer: String) -> Self {
        Self {
            mode,
            query: query.text().to_string(),
            answer,
        }
    }
}
