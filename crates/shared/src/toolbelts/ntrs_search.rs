// crates/shared/src/toolbelts/ntrs_search.rs

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::Html;
use tracing::info;

use crate::registry::LookupTool;
use crate::schemas::ToolSchema;

pub const TOOL_ID: &str = "web_scraper";

const MAX_RESULTS: usize = 3;

const SCHEMA: ToolSchema = ToolSchema {
    name: TOOL_ID,
    description: "A real-time search of NASA's public Technical Reports Server for \
                  mission-related documents, research and specifications.",
};

pub const NO_RESULTS: &str = "Web scraper ran successfully but found no results on the NASA \
                              technical reports server for that query.";

/// Title search against the NASA Technical Reports Server (NTRS).
pub struct NtrsSearch {
    base_url: String,
    client: reqwest::Client,
}

impl NtrsSearch {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("AstroArchive/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build NTRS HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl LookupTool for NtrsSearch {
    fn schema(&self) -> &ToolSchema {
        &SCHEMA
    }

    async fn search(&self, query: &str) -> Result<String> {
        info!("Executing NTRS search for: '{}'", query);
        let url = format!(
            "{}/api/citations/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("NTRS request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("NTRS search returned status {}", response.status());
        }

        let data: serde_json::Value = response
            .json()
            .await
            .context("NTRS returned an unreadable response")?;

        Ok(format_results(&top_titles(&data, MAX_RESULTS)))
    }
}

/// Titles of the first `limit` results, markup stripped, blanks skipped.
fn top_titles(data: &serde_json::Value, limit: usize) -> Vec<String> {
    let Some(results) = data["results"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|result| result["title"].as_str())
        .map(strip_markup)
        .filter(|title| !title.is_empty())
        .take(limit)
        .collect()
}

// NTRS titles carry inline HTML such as <sub>2</sub> and entities.
fn strip_markup(title: &str) -> String {
    let fragment = Html::parse_fragment(title);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_results(titles: &[String]) -> String {
    if titles.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut output = String::from("Found the following top results from NASA's public database:");
    for title in titles {
        output.push_str(&format!("\n  - {}", title));
    }
    output
}
