use anyhow::Result;
use archive_shared::{DispatchResult, QueryRequest};

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn query(&self, text: &str) -> Result<DispatchResult> {
        let url = format!("{}/api/inventory/query", self.base_url);

        let request = QueryRequest {
            query: Some(text.to_string()),
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body["error"].as_str().unwrap_or("request failed");
            return Err(anyhow::anyhow!("{} ({})", message, status));
        }

        let result = response.json::<DispatchResult>().await?;
        Ok(result)
    }

    pub async fn status(&self) -> Result<serde_json::Value> {
        let url = format!("{}/api/status", self.base_url);

        let response = self.client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        Ok(response)
    }
}
