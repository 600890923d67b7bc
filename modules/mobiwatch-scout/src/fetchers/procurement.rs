use async_trait::async_trait;
use tracing::warn;

use kkj_client::KkjClient;
use mobiwatch_common::{ResultRecord, ResultSource};

use crate::traits::SearchFetcher;

/// Notices older than this are not worth reporting.
const ISSUE_WINDOW_DAYS: u64 = 30;

/// Tender notices from the government procurement portal, scoped to the
/// monitored prefectures.
pub struct KkjFetcher {
    client: KkjClient,
    lg_codes: Vec<&'static str>,
}

impl KkjFetcher {
    pub fn new(lg_codes: Vec<&'static str>) -> Self {
        Self {
            client: KkjClient::new(),
            lg_codes,
        }
    }
}

#[async_trait]
impl SearchFetcher for KkjFetcher {
    async fn fetch(&self, query: &str) -> Vec<ResultRecord> {
        let notices = match self
            .client
            .search(query, &self.lg_codes, ISSUE_WINDOW_DAYS)
            .await
        {
            Ok(notices) => notices,
            Err(e) => {
                warn!(query, error = %e, "Procurement API failed, continuing without results");
                return Vec::new();
            }
        };

        notices
            .into_iter()
            .map(|notice| {
                let mut record = ResultRecord::new(
                    notice.project_name,
                    notice.document_url,
                    ResultSource::Kkj,
                );
                record.organization = none_if_empty(notice.organization);
                record.prefecture = none_if_empty(notice.prefecture);
                record.deadline = none_if_empty(notice.deadline);
                record
            })
            .collect()
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
