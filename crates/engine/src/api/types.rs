use archive_shared::BackendMode;
use serde::Serialize;

// Status endpoint
#[derive(Serialize)]
pub struct StatusResponse {
    pub candidate_mode: BackendMode,
    pub inventory_items: usize,
    pub tools: Vec<&'static str>,
}
