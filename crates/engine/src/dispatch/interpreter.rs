// crates/engine/src/dispatch/interpreter.rs

use archive_shared::{ToolInvocationRequest, ToolRegistry};
use serde_json::Value;
use tracing::debug;

/// What a backend's raw completion turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    DirectAnswer(String),
    ToolInvocation(ToolInvocationRequest),
}

/// Classify a raw completion.
///
/// Only a completion that is, after trimming, exactly one JSON object naming a
/// registered tool in `tool_to_use` is a tool call. Everything else, including
/// prose around JSON, fenced JSON and objects of the wrong shape, is a direct
/// answer and is returned untouched.
pub fn interpret(raw: &str, user_query: &str, tools: &ToolRegistry) -> ModelOutput {
    match parse_tool_request(raw, user_query, tools) {
        Some(request) => {
            debug!("Completion is a tool request for '{}'", request.tool);
            ModelOutput::ToolInvocation(request)
        }
        None => ModelOutput::DirectAnswer(raw.to_string()),
    }
}

fn parse_tool_request(raw: &str, user_query: &str, tools: &ToolRegistry) -> Option<ToolInvocationRequest> {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw.trim()) else {
        return None;
    };

    let tool = object.get("tool_to_use")?.as_str()?;
    if !tools.contains(tool) {
        return None;
    }

    let search_query = match object.get("search_query") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        None | Some(Value::Null) | Some(Value::String(_)) => user_query.to_string(),
        Some(other) => other.to_string(),
    };

    Some(ToolInvocationRequest {
        tool: tool.to_string(),
        search_query,
    })
}
