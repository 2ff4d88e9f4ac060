use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use super::handlers;
use crate::dispatch::Dispatcher;

pub fn create_router() -> Router<Arc<Dispatcher>> {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/api/status", get(handlers::handle_status))
        .route("/api/inventory/query", post(handlers::handle_inventory_query))
}
