use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use mobiwatch_common::{ResultRecord, ResultSource, WatchPage};

use crate::extract::{extract_page_date, extract_title, strip_tags, truncate_snippet};
use crate::traits::PageWatcher;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; MobiwatchBot/1.0)";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of the page body survives into the record snippet.
const SNIPPET_CHARS: usize = 200;

/// Plain HTTP page watcher. The watched pages are server-rendered municipal
/// and operator sites, so no JS rendering is needed.
pub struct HttpPageWatcher {
    client: reqwest::Client,
}

impl HttpPageWatcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("Page request failed")?
            .error_for_status()
            .context("Page returned error status")?;

        Ok(resp.text().await.context("Failed to read page body")?)
    }
}

impl Default for HttpPageWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageWatcher for HttpPageWatcher {
    async fn watch(&self, page: &WatchPage) -> Option<ResultRecord> {
        let html = match self.fetch_html(page.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = page.url, error = %e, "Page fetch failed, skipping");
                return None;
            }
        };

        let text = strip_tags(&html);
        let matched: Vec<String> = page
            .keywords()
            .into_iter()
            .filter(|keyword| text.contains(keyword))
            .map(|keyword| keyword.to_string())
            .collect();

        if matched.is_empty() {
            debug!(url = page.url, "No keyword match");
            return None;
        }

        let mut record = ResultRecord::new(
            extract_title(&html).unwrap_or_default(),
            page.url,
            ResultSource::Direct,
        );
        record.prefecture = if page.prefecture.is_empty() {
            None
        } else {
            Some(page.prefecture.to_string())
        };
        record.organization = Some(page.organization.to_string());
        record.snippet = Some(truncate_snippet(&text, SNIPPET_CHARS));
        record.update_date = extract_page_date(&html, &text);
        record.matched_keywords = matched;

        debug!(
            url = page.url,
            keywords = record.matched_keywords.len(),
            "Watched page matched"
        );
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Transport is exercised in integration environments; here we only pin
    // down the URL guard.
    #[tokio::test]
    async fn rejects_non_http_urls() {
        let watcher = HttpPageWatcher::new();
        let err = watcher.fetch_html("file:///etc/passwd").await.unwrap_err();
        assert!(err.to_string().contains("http"));
    }
}
