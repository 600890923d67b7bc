//! Fetch collaborators. Each one owns its transport completely: failures
//! are logged and absorbed into empty results so a flaky source can never
//! abort a run.

mod pages;
mod procurement;
mod search;

pub use pages::HttpPageWatcher;
pub use procurement::KkjFetcher;
pub use search::GoogleSearchFetcher;
