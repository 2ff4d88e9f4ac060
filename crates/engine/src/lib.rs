pub mod api;
pub mod backend;
pub mod config;
pub mod dispatch;

pub use config::EngineConfig;
pub use dispatch::{BackendConfiguration, Dispatcher};
