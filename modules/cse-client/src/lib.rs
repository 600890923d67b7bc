pub mod error;
pub mod types;

pub use error::{CseError, Result};
pub use types::{SearchItem, SearchResponse};

use std::time::Duration;

use tracing::info;

const BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Results per request. 10 is the API maximum.
const PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct CseClient {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
}

impl CseClient {
    pub fn new(api_key: String, cse_id: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            cse_id,
        }
    }

    /// Run one search query. `start` is the 1-based index of the first
    /// result; each call returns at most one page of 10.
    pub async fn search(&self, query: &str, start: u32) -> Result<Vec<SearchItem>> {
        info!(query, start, "CSE search");

        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("start", &start.to_string()),
                ("num", &PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: SearchResponse = resp.json().await?;

        info!(query, count = data.items.len(), "CSE search complete");
        Ok(data.items)
    }
}
