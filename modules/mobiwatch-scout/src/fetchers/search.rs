use async_trait::async_trait;
use tracing::warn;

use cse_client::CseClient;
use mobiwatch_common::{ResultRecord, ResultSource};

use crate::extract::{extract_prefecture, extract_snippet_date};
use crate::traits::SearchFetcher;

/// Scope prefix applied to generic queries: municipal government domains
/// only. Aggregator queries already carry their own `site:` scope.
const GOV_SITE_SCOPE: &str = "site:*.lg.jp";

/// Web search via the Google Custom Search API, for both the generic bucket
/// and the per-aggregator buckets.
pub struct GoogleSearchFetcher {
    client: CseClient,
    source: ResultSource,
    scope_to_gov_sites: bool,
}

impl GoogleSearchFetcher {
    /// Generic bucket: queries are scoped to government sites.
    pub fn generic(client: CseClient) -> Self {
        Self {
            client,
            source: ResultSource::Search,
            scope_to_gov_sites: true,
        }
    }

    /// Aggregator bucket: queries pass through verbatim and results are
    /// tagged with the aggregator's name.
    pub fn aggregator(client: CseClient, site: &str) -> Self {
        Self {
            client,
            source: ResultSource::Aggregator(site.to_string()),
            scope_to_gov_sites: false,
        }
    }
}

#[async_trait]
impl SearchFetcher for GoogleSearchFetcher {
    async fn fetch(&self, query: &str) -> Vec<ResultRecord> {
        let full_query = if self.scope_to_gov_sites {
            format!("{GOV_SITE_SCOPE} {query}")
        } else {
            query.to_string()
        };

        let items = match self.client.search(&full_query, 1).await {
            Ok(items) => items,
            Err(e) => {
                warn!(query = %full_query, error = %e, "Search failed, continuing without results");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter(|item| !item.link.is_empty())
            .map(|item| {
                let haystack = format!("{} {} {}", item.title, item.snippet, item.link);
                let mut record =
                    ResultRecord::new(item.title, item.link, self.source.clone());
                record.update_date = extract_snippet_date(&item.snippet);
                record.prefecture = extract_prefecture(&haystack);
                record.snippet = Some(item.snippet);
                record
            })
            .collect()
    }
}
