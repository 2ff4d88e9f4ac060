pub mod ntrs_search;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::registry::ToolRegistry;

/// Registry with every toolbelt the server ships.
pub fn standard_registry(ntrs_base_url: &str, lookup_timeout: Duration) -> Result<ToolRegistry> {
    let ntrs = ntrs_search::NtrsSearch::new(ntrs_base_url, lookup_timeout)?;
    Ok(ToolRegistry::new().with_tool(Arc::new(ntrs)))
}
