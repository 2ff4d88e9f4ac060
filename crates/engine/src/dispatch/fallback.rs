// crates/engine/src/dispatch/fallback.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use archive_shared::BackendMode;
use tracing::{error, info, warn};

use crate::backend::{BackendError, GeminiBackend, InferenceBackend, LmStudioBackend};
use crate::config::EngineConfig;

/// Text produced by the backend selector for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub mode: BackendMode,
    pub text: String,
}

/// Which backends this process may use, decided once before serving.
///
/// `online` is `Some` only if the remote backend was established at startup.
/// A later per-request failure triggers fallback for that request but never
/// changes this value.
#[derive(Clone)]
pub struct BackendConfiguration {
    online: Option<Arc<dyn InferenceBackend>>,
    offline: Arc<dyn InferenceBackend>,
}

impl BackendConfiguration {
    pub fn new(online: Option<Arc<dyn InferenceBackend>>, offline: Arc<dyn InferenceBackend>) -> Self {
        Self { online, offline }
    }

    pub fn offline_only(offline: Arc<dyn InferenceBackend>) -> Self {
        Self::new(None, offline)
    }

    /// Build both backends from config and decide whether Online is available.
    pub async fn establish(config: &EngineConfig) -> Result<Self> {
        let offline: Arc<dyn InferenceBackend> = Arc::new(
            LmStudioBackend::new(config.offline.clone(), config.inference_timeout)
                .context("Failed to build the offline backend")?,
        );

        let online = match GeminiBackend::new(&config.online, config.inference_timeout) {
            Ok(backend) => Some(Arc::new(backend) as Arc<dyn InferenceBackend>),
            Err(e) => {
                warn!("Online backend unavailable: {}. Falling back to OFFLINE mode (LM Studio).", e);
                None
            }
        };

        Ok(Self::resolve(online, offline, config.online.probe).await)
    }

    /// Keep `candidate` as the online backend only if its probe succeeds.
    pub async fn resolve(
        candidate: Option<Arc<dyn InferenceBackend>>,
        offline: Arc<dyn InferenceBackend>,
        probe: bool,
    ) -> Self {
        let online = match candidate {
            Some(backend) if probe => match backend.probe().await {
                Ok(()) => Some(backend),
                Err(e) => {
                    warn!(
                        "Online backend '{}' failed its startup probe: {}. Falling back to OFFLINE mode (LM Studio).",
                        backend.name(),
                        e
                    );
                    None
                }
            },
            other => other,
        };

        let configuration = Self::new(online, offline);
        info!("Backend configuration fixed: {}", configuration.candidate_mode());
        configuration
    }

    /// The mode a request gets when nothing goes wrong.
    pub fn candidate_mode(&self) -> BackendMode {
        if self.online.is_some() {
            BackendMode::Online
        } else {
            BackendMode::Offline
        }
    }

    /// Run the prompt through Online, demoting to Offline on failure.
    ///
    /// Never fails: a terminal offline failure becomes the completion text.
    pub async fn complete(&self, prompt: &str) -> Completion {
        let mode = match &self.online {
            Some(online) => match call(online.as_ref(), prompt).await {
                Ok(text) => {
                    return Completion {
                        mode: BackendMode::Online,
                        text,
                    };
                }
                Err(e) => {
                    warn!("Online call to '{}' failed, falling back to offline: {}", online.name(), e);
                    BackendMode::OfflineFallback
                }
            },
            None => BackendMode::Offline,
        };

        let text = match call(self.offline.as_ref(), prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Offline call to '{}' failed: {}", self.offline.name(), e);
                describe_offline_failure(&e)
            }
        };

        Completion { mode, text }
    }
}

impl std::fmt::Debug for BackendConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfiguration")
            .field("online", &self.online.as_ref().map(|b| b.name()))
            .field("offline", &self.offline.name())
            .finish()
    }
}

/// A blank completion counts as a failure of the backend that produced it.
async fn call(backend: &dyn InferenceBackend, prompt: &str) -> Result<String, BackendError> {
    let text = backend.complete(prompt).await?;
    if text.trim().is_empty() {
        return Err(BackendError::EmptyCompletion);
    }
    Ok(text)
}

/// User-facing text for a failure with no backend left to try.
pub fn describe_offline_failure(err: &BackendError) -> String {
    if err.is_unreachable() {
        "Error: Could not connect to the local LM Studio server. Is it running?".to_string()
    } else {
        format!(
            "Error: The local inference server failed to produce an answer. Details: {}",
            err
        )
    }
}
