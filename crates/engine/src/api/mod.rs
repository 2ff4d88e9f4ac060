pub mod routes;
pub mod handlers;
pub mod server;
pub mod types;

pub use server::{build_app, start_server};
