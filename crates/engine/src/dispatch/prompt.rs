// crates/engine/src/dispatch/prompt.rs

use archive_shared::{Inventory, Query, ToolRegistry};

const PERSONA: &str = "You are Astro Archive, an AI quartermaster for a space mission. \
Your primary purpose is to answer questions based ONLY on the provided inventory list.";

/// Render the single instruction prompt sent to whichever backend answers.
///
/// The tool block tells the model to reply with a bare JSON object when it
/// wants a tool; the interpreter only recognises a reply that is that object
/// and nothing else.
pub fn compile(query: &Query, inventory: &Inventory, tools: &ToolRegistry) -> String {
    let facts = inventory
        .items()
        .iter()
        .map(|item| item.fact_line())
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = String::new();
    prompt.push_str(PERSONA);
    prompt.push_str("\n\nINVENTORY DATA:\n");
    prompt.push_str(&facts);
    prompt.push_str("\n\n");

    if !tools.is_empty() {
        prompt.push_str(&tool_block(tools));
        prompt.push_str("\n\n");
    }

    prompt.push_str("If you can answer the question from the inventory, just provide a direct, concise answer.\n\n");
    prompt.push_str("--- TASK ---\n");
    prompt.push_str(&format!(
        "Based on all of this, answer the following question: \"{}\"",
        query.text()
    ));

    prompt
}

fn tool_block(tools: &ToolRegistry) -> String {
    let ids = tools.ids();
    let tool_id = match ids.as_slice() {
        [only] => only.to_string(),
        _ => format!("<one of: {}>", ids.join(", ")),
    };

    let mut block = String::from("--- AVAILABLE TOOLS ---\n");
    for schema in tools.schemas() {
        block.push_str(&format!("- {}: {}\n", schema.name, schema.description));
    }

    block.push_str(
        "\nTOOL INSTRUCTIONS:\n\
         If a user's question CANNOT be answered using the inventory data but seems like a \
         request for technical information, research, or specifications (e.g., \"Find specs \
         for...\", \"Look up research on...\"), you MUST respond with ONLY the following JSON \
         object and nothing else. Do not add any explanation and do not wrap it in markdown:\n",
    );
    block.push_str(&format!(
        "{{\"tool_to_use\": \"{}\", \"search_query\": \"<the user's original question or a refined search term>\"}}",
        tool_id
    ));
    block
}
