// Trait seams between the core and its collaborators.
//
// Fetchers own all transport error handling: a failed fetch degrades to an
// empty result set, logged locally, never an error the scheduler has to
// unwind. The seams also enable deterministic testing with mock
// implementations, with no network and no API keys.

use anyhow::Result;
use async_trait::async_trait;

use mobiwatch_common::{ResultRecord, WatchPage};

#[async_trait]
pub trait SearchFetcher: Send + Sync {
    /// Run one search query. Every record is tagged with its source and
    /// fetch timestamp. Empty on transport failure.
    async fn fetch(&self, query: &str) -> Vec<ResultRecord>;
}

#[async_trait]
pub trait PageWatcher: Send + Sync {
    /// Fetch one watched page. `None` when the page is unreachable or no
    /// domain keyword matches its content.
    async fn watch(&self, page: &WatchPage) -> Option<ResultRecord>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the already-filtered, already-sorted notification subset.
    /// Returns whether a message actually went out.
    async fn notify(&self, items: &[ResultRecord]) -> Result<bool>;
}
