// crates/shared/src/inventory/mod.rs

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One record of the mission inventory, as stored in `inventory.json`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: i64,
    pub location: String,
    pub status: String,
}

impl InventoryItem {
    /// Render this item as a single bulleted fact line for the prompt.
    pub fn fact_line(&self) -> String {
        format!(
            "- {} (ID: {}): Quantity {}, Located at '{}', Status: {}.",
            self.item_name, self.item_id, self.quantity, self.location, self.status
        )
    }
}

/// Read-only inventory shared by every request.
///
/// Cloning is cheap: all clones point at the same slice.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    items: Arc<[InventoryItem]>,
}

impl Inventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items: items.into() }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read inventory file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse inventory file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let items: Vec<InventoryItem> = serde_json::from_str(content)?;
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
