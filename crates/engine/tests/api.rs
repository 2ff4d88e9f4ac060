use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use archive_engine::backend::{BackendError, BackendResult, InferenceBackend};
use archive_engine::{api, BackendConfiguration, Dispatcher};
use archive_shared::{Inventory, InventoryItem, LookupTool, ToolRegistry, ToolSchema};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

struct ScriptedBackend {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(reply: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self { reply, calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str) -> BackendResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .map(str::to_string)
            .ok_or_else(|| BackendError::Connect("connection refused".to_string()))
    }
}

const NTRS: ToolSchema = ToolSchema {
    name: "web_scraper",
    description: "NASA technical reports",
};

struct CannedSearch;

#[async_trait]
impl LookupTool for CannedSearch {
    fn schema(&self) -> &ToolSchema {
        &NTRS
    }

    async fn search(&self, query: &str) -> anyhow::Result<String> {
        Ok(format!(
            "Found the following top results from NASA's public database:\n  - {} handbook",
            query
        ))
    }
}

fn app(online: Option<Arc<ScriptedBackend>>, offline: Arc<ScriptedBackend>) -> Router {
    let inventory = Inventory::new(vec![InventoryItem {
        item_id: "A1".to_string(),
        item_name: "Oxygen Tank".to_string(),
        quantity: 4,
        location: "Bay 3".to_string(),
        status: "Sealed".to_string(),
    }]);
    let online = online.map(|b| b as Arc<dyn InferenceBackend>);
    let backends = BackendConfiguration::new(online, offline);
    let tools = ToolRegistry::new().with_tool(Arc::new(CannedSearch));

    api::build_app(Dispatcher::new(backends, inventory, tools))
}

async fn post_query(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/inventory/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn answers_from_online_backend() {
    let online = ScriptedBackend::new(Some("There are 4 oxygen tanks in Bay 3."));
    let offline = ScriptedBackend::new(Some("unused"));

    let (status, body) = post_query(
        app(Some(online), offline.clone()),
        r#"{"query": "How many oxygen tanks are there?"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "mode": "ONLINE (Gemini)",
            "user_query": "How many oxygen tanks are there?",
            "ai_response": "There are 4 oxygen tanks in Bay 3."
        })
    );
    assert_eq!(offline.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn falls_back_and_runs_requested_tool() {
    let online = ScriptedBackend::new(None);
    let offline = ScriptedBackend::new(Some(
        r#"{"tool_to_use": "web_scraper", "search_query": "ion thrusters"}"#,
    ));

    let (status, body) = post_query(
        app(Some(online), offline.clone()),
        r#"{"query": "Find specs for ion thrusters"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "OFFLINE (LM Studio Fallback)");
    assert_eq!(
        body["ai_response"],
        "Found the following top results from NASA's public database:\n  - ion thrusters handbook"
    );
    assert_eq!(offline.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn offline_failure_is_a_200_with_error_text() {
    let offline = ScriptedBackend::new(None);

    let (status, body) = post_query(app(None, offline), r#"{"query": "Where is the rover?"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "OFFLINE (LM Studio)");
    assert_eq!(
        body["ai_response"],
        "Error: Could not connect to the local LM Studio server. Is it running?"
    );
}

#[tokio::test]
async fn missing_or_blank_query_is_bad_request() {
    for body in [r#"{}"#, r#"{"query": ""}"#, r#"{"query": "   "}"#, r#"{"query": null}"#, "not json"] {
        let offline = ScriptedBackend::new(Some("unused"));
        let (status, response) = post_query(app(None, offline.clone()), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response, json!({ "error": "Query not provided" }));
        assert_eq!(offline.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn status_reports_candidate_mode() {
    let request = Request::builder().uri("/api/status").body(Body::empty()).unwrap();
    let response = app(None, ScriptedBackend::new(Some("unused")))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({
            "candidate_mode": "OFFLINE (LM Studio)",
            "inventory_items": 1,
            "tools": ["web_scraper"]
        })
    );
}
