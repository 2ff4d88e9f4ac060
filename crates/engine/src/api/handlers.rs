use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

use archive_shared::{DispatchResult, Query, QueryError, QueryRequest};

use crate::dispatch::Dispatcher;
use super::types::StatusResponse;

type ApiError = (StatusCode, Json<serde_json::Value>);

pub async fn handle_inventory_query(
    State(dispatcher): State<Arc<Dispatcher>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<DispatchResult>, ApiError> {
    let query = match payload {
        Ok(Json(request)) => request.query.ok_or(QueryError::Empty).and_then(Query::new),
        Err(rejection) => {
            debug!("Rejected query body: {}", rejection);
            Err(QueryError::Empty)
        }
    }
    .map_err(|e| (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))))?;

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("query", %request_id);

    let result = async {
        info!("Received query: '{}'", query);
        let result = dispatcher.submit(&query).await;
        info!("Answered in {} mode", result.mode);
        result
    }
    .instrument(span)
    .await;

    Ok(Json(result))
}

pub async fn handle_status(State(dispatcher): State<Arc<Dispatcher>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        candidate_mode: dispatcher.candidate_mode(),
        inventory_items: dispatcher.inventory().len(),
        tools: dispatcher.tools().ids(),
    })
}

pub async fn health_check() -> &'static str {
    "Astro Archive is running"
}
