//! Per-query pipeline: prompt -> backend selection -> interpretation -> optional tool -> result.

pub mod fallback;
pub mod interpreter;
pub mod prompt;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use archive_shared::{BackendMode, DispatchResult, Inventory, Query, ToolRegistry};
use tracing::{debug, info};

pub use fallback::{BackendConfiguration, Completion};
pub use interpreter::{interpret, ModelOutput};

/// Everything a request needs, fixed at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    backends: Arc<BackendConfiguration>,
    inventory: Inventory,
    tools: ToolRegistry,
}

impl Dispatcher {
    pub fn new(backends: BackendConfiguration, inventory: Inventory, tools: ToolRegistry) -> Self {
        Self {
            backends: Arc::new(backends),
            inventory,
            tools,
        }
    }

    pub fn candidate_mode(&self) -> BackendMode {
        self.backends.candidate_mode()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer one query. Always returns a result with a non-empty answer.
    pub async fn submit(&self, query: &Query) -> DispatchResult {
        let prompt = prompt::compile(query, &self.inventory, &self.tools);
        debug!("Compiled prompt of {} chars", prompt.len());

        let Completion { mode, text } = self.backends.complete(&prompt).await;

        let answer = match interpret(&text, query.text(), &self.tools) {
            ModelOutput::DirectAnswer(text) => text,
            ModelOutput::ToolInvocation(request) => {
                info!("Model requested tool '{}'", request.tool);
                self.tools.execute(&request).await
            }
        };

        DispatchResult::assemble(mode, query, answer)
    }
}
