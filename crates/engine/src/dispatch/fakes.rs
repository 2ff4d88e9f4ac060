//! Scripted backends and tools for dispatch tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use archive_shared::{LookupTool, ToolSchema};
use async_trait::async_trait;

use crate::backend::{BackendError, BackendResult, InferenceBackend};

const FAKE_TOOL: ToolSchema = ToolSchema {
    name: "web_scraper",
    description: "Scripted lookup",
};

pub struct FakeBackend {
    name: &'static str,
    reply: std::result::Result<String, String>,
    probe_ok: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn answering(name: &'static str, text: &str) -> Self {
        Self::build(name, Ok(text.to_string()), true)
    }

    pub fn failing(name: &'static str, reason: &str) -> Self {
        Self::build(name, Err(reason.to_string()), true)
    }

    pub fn unreachable(name: &'static str) -> Self {
        Self::build(name, Err("unreachable".to_string()), false)
    }

    fn build(name: &'static str, reply: std::result::Result<String, String>, probe_ok: bool) -> Self {
        Self {
            name,
            reply,
            probe_ok,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl InferenceBackend for FakeBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, prompt: &str) -> BackendResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(BackendError::Connect)
    }

    async fn probe(&self) -> BackendResult<()> {
        if self.probe_ok {
            Ok(())
        } else {
            Err(BackendError::Connect("probe refused".to_string()))
        }
    }
}

pub struct FakeTool {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeTool {
    pub fn answering(text: &str) -> Self {
        Self::build(Ok(text.to_string()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::build(Err(reason.to_string()))
    }

    fn build(reply: std::result::Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LookupTool for FakeTool {
    fn schema(&self) -> &ToolSchema {
        &FAKE_TOOL
    }

    async fn search(&self, query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.reply.clone().map_err(|reason| anyhow::anyhow!(reason))
    }
}
