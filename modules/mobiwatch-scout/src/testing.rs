//! Mock collaborators for deterministic tests: no network, no API keys.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use mobiwatch_common::{ResultRecord, ResultSource, WatchPage};

use crate::traits::{Notifier, PageWatcher, SearchFetcher};

/// A search result dated today, so it passes the notification window.
pub fn make_record(url: &str) -> ResultRecord {
    let mut record = ResultRecord::new(format!("title for {url}"), url, ResultSource::Search);
    record.update_date = Some(Utc::now().date_naive());
    record
}

/// Returns the same canned records for every query and remembers what it
/// was asked.
pub struct MockSearchFetcher {
    results: Vec<ResultRecord>,
    pub queries: Mutex<Vec<String>>,
}

impl MockSearchFetcher {
    pub fn new(results: Vec<ResultRecord>) -> Self {
        Self {
            results,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchFetcher for MockSearchFetcher {
    async fn fetch(&self, query: &str) -> Vec<ResultRecord> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.clone()
    }
}

#[async_trait]
impl SearchFetcher for Arc<MockSearchFetcher> {
    async fn fetch(&self, query: &str) -> Vec<ResultRecord> {
        (**self).fetch(query).await
    }
}

/// Serves canned records for specific page URLs, `None` for the rest.
#[derive(Default)]
pub struct MockPageWatcher {
    by_url: HashMap<String, ResultRecord>,
}

impl MockPageWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, record: ResultRecord) -> Self {
        self.by_url.insert(url.to_string(), record);
        self
    }
}

#[async_trait]
impl PageWatcher for MockPageWatcher {
    async fn watch(&self, page: &WatchPage) -> Option<ResultRecord> {
        self.by_url.get(page.url).cloned()
    }
}

#[async_trait]
impl PageWatcher for Arc<MockPageWatcher> {
    async fn watch(&self, page: &WatchPage) -> Option<ResultRecord> {
        (**self).watch(page).await
    }
}

/// Records every delivery and reports success.
#[derive(Default)]
pub struct MockNotifier {
    pub deliveries: Mutex<Vec<Vec<ResultRecord>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, items: &[ResultRecord]) -> Result<bool> {
        self.deliveries.lock().unwrap().push(items.to_vec());
        Ok(true)
    }
}

#[async_trait]
impl Notifier for Arc<MockNotifier> {
    async fn notify(&self, items: &[ResultRecord]) -> Result<bool> {
        (**self).notify(items).await
    }
}
