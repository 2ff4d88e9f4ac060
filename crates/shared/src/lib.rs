pub mod inventory;
pub mod query;
pub mod registry;
pub mod schemas;
pub mod toolbelts;

pub use inventory::{Inventory, InventoryItem};
pub use query::{BackendMode, DispatchResult, Query, QueryError, QueryRequest};
pub use registry::{LookupTool, ToolRegistry};
pub use schemas::{ToolInvocationRequest, ToolSchema};
