// crates/shared/src/registry/mod.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::schemas::{ToolInvocationRequest, ToolSchema};

/// An external capability the model may ask for instead of answering.
#[async_trait]
pub trait LookupTool: Send + Sync {
    fn schema(&self) -> &ToolSchema;

    async fn search(&self, query: &str) -> Result<String>;
}

/// Tool identifier -> implementation. Read-only once the server starts.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn LookupTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: Arc<dyn LookupTool>) -> Self {
        self.register(tool);
        self
    }

    pub fn register(&mut self, tool: Arc<dyn LookupTool>) {
        let name = tool.schema().name;
        if self.tools.insert(name, tool).is_some() {
            warn!("Tool '{}' registered twice, keeping the latest", name);
        }
    }

    /// Exact, case-sensitive match against registered identifiers.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn schemas(&self) -> Vec<&ToolSchema> {
        self.tools.values().map(|tool| tool.schema()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the requested tool and return the text that replaces the model's answer.
    ///
    /// Never fails: unknown tools and tool errors come back as readable error text.
    pub async fn execute(&self, request: &ToolInvocationRequest) -> String {
        let Some(tool) = self.tools.get(request.tool.as_str()) else {
            warn!("Model requested unknown tool '{}'", request.tool);
            return format!("Error: The requested tool '{}' is not available.", request.tool);
        };

        info!("Toolbox activated: {} (query: '{}')", request.tool, request.search_query);

        match tool.search(&request.search_query).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Tool '{}' returned no content", request.tool);
                format!("The {} tool ran but returned no content for that query.", request.tool)
            }
            Ok(text) => text,
            Err(e) => {
                error!("Tool '{}' failed: {:#}", request.tool, e);
                format!("Error: The {} tool failed to execute. Details: {:#}", request.tool, e)
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.ids()).finish()
    }
}
