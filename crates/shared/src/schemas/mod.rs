// crates/shared/src/schemas/mod.rs
use serde::{Deserialize, Serialize};

/// Static description of a tool, rendered into the prompt's tool block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
}

/// A tool call parsed out of a model's raw completion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocationRequest {
    pub tool: String,
    pub search_query: String,
}
