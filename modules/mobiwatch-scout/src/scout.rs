//! One full watch run: select the query batch, drive the fetch
//! collaborators, merge against history, persist, notify.

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use mobiwatch_common::{catalogs, Catalogs, MobiwatchError, ResultRecord};

use crate::merge;
use crate::notify;
use crate::run_log::{EventKind, RunLog};
use crate::scheduling::{Budget, QuerySelector};
use crate::store::{JsonStore, QueryStateStore, ResultLog, SeenUrlStore};
use crate::traits::{Notifier, PageWatcher, SearchFetcher};

/// Watched pages fetched concurrently. Search queries stay sequential;
/// they are quota-bound, not latency-bound.
const MAX_CONCURRENT_PAGES: usize = 4;

/// Stats from a watch run.
#[derive(Debug, Default, Serialize)]
pub struct RunStats {
    pub queries_selected: usize,
    pub search_results: usize,
    pub aggregator_results: usize,
    pub procurement_results: usize,
    pub pages_matched: usize,
    pub new_items: usize,
    pub notified: usize,
    pub notification_sent: bool,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Watch Run Complete ===")?;
        writeln!(f, "Queries selected:    {}", self.queries_selected)?;
        writeln!(f, "Search results:      {}", self.search_results)?;
        writeln!(f, "Aggregator results:  {}", self.aggregator_results)?;
        writeln!(f, "Procurement results: {}", self.procurement_results)?;
        writeln!(f, "Pages matched:       {}", self.pages_matched)?;
        writeln!(f, "New items:           {}", self.new_items)?;
        writeln!(
            f,
            "Notified:            {} (sent: {})",
            self.notified, self.notification_sent
        )?;
        Ok(())
    }
}

/// Collaborators injected at the trait seams.
pub struct ScoutDeps {
    pub generic_search: Box<dyn SearchFetcher>,
    /// One fetcher per aggregator site, keyed by the site's catalog name.
    pub site_search: Vec<(String, Box<dyn SearchFetcher>)>,
    pub procurement: Box<dyn SearchFetcher>,
    pub page_watcher: Box<dyn PageWatcher>,
    pub notifier: Box<dyn Notifier>,
}

pub struct Scout {
    catalogs: Catalogs,
    budget: Budget,
    store: JsonStore,
    deps: ScoutDeps,
}

impl Scout {
    /// Budget problems surface here, before anything is fetched or written.
    pub fn new(
        catalogs: Catalogs,
        budget: Budget,
        store: JsonStore,
        deps: ScoutDeps,
    ) -> Result<Self, MobiwatchError> {
        budget.validate()?;
        Ok(Self {
            catalogs,
            budget,
            store,
            deps,
        })
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunStats> {
        let mut run_log = RunLog::new(Uuid::new_v4().to_string());
        let mut stats = RunStats::default();

        // Load persisted state. Corruption is fatal here, before the quota
        // is touched.
        let mut state = QueryStateStore::load(&self.store)?;
        let mut seen = SeenUrlStore::load(&self.store)?;
        let mut result_log = ResultLog::load(&self.store)?;
        info!(
            known_queries = state.len(),
            seen_urls = seen.len(),
            logged_results = result_log.len(),
            "State loaded"
        );

        // Pick and commit this run's query batch. The state file is written
        // before any fetch, so a crashed run costs staleness, not quota.
        let selector = QuerySelector::new(&self.catalogs, &self.budget);
        let selected = selector.select_for_run(&self.store, &mut state, now)?;
        stats.queries_selected = selected.total();
        run_log.log(EventKind::QuerySelection {
            general: selected.general.len(),
            site_buckets: selected.sites.len(),
            total: selected.total(),
        });

        // Generic search bucket (combination + event queries).
        let mut search_stream: Vec<ResultRecord> = Vec::new();
        for query in &selected.general {
            let records = self.deps.generic_search.fetch(query).await;
            run_log.log(EventKind::SearchQuery {
                query: query.clone(),
                source: "search".to_string(),
                result_count: records.len(),
            });
            search_stream.extend(records);
        }
        stats.search_results = search_stream.len();

        // Aggregator buckets.
        let mut aggregator_stream: Vec<ResultRecord> = Vec::new();
        for selection in &selected.sites {
            let Some((_, fetcher)) = self
                .deps
                .site_search
                .iter()
                .find(|(name, _)| *name == selection.site)
            else {
                warn!(site = %selection.site, "No fetcher configured for site, skipping its bucket");
                continue;
            };
            for query in &selection.queries {
                let records = fetcher.fetch(query).await;
                run_log.log(EventKind::SearchQuery {
                    query: query.clone(),
                    source: selection.site.clone(),
                    result_count: records.len(),
                });
                aggregator_stream.extend(records);
            }
        }
        stats.aggregator_results = aggregator_stream.len();

        // Procurement portal probes. These are outside the search quota and
        // use their own fixed keyword list.
        let mut procurement_stream: Vec<ResultRecord> = Vec::new();
        for probe in catalogs::procurement_probes() {
            let records = self.deps.procurement.fetch(probe).await;
            run_log.log(EventKind::ProcurementQuery {
                query: probe.to_string(),
                result_count: records.len(),
            });
            procurement_stream.extend(records);
        }
        stats.procurement_results = procurement_stream.len();

        // Directly watched pages, bounded concurrency, catalog order kept.
        let pages = catalogs::watch_pages();
        let watcher = self.deps.page_watcher.as_ref();
        let outcomes: Vec<(&str, Option<ResultRecord>)> = stream::iter(pages.iter())
            .map(|page| async move { (page.url, watcher.watch(page).await) })
            .buffered(MAX_CONCURRENT_PAGES)
            .collect()
            .await;
        let mut page_stream: Vec<ResultRecord> = Vec::new();
        for (url, record) in outcomes {
            run_log.log(EventKind::PageWatch {
                url: url.to_string(),
                matched: record.is_some(),
            });
            page_stream.extend(record);
        }
        stats.pages_matched = page_stream.len();

        // Merge in priority order and persist the appended stores. If this
        // write fails the run is inconsistent (queries are marked run but
        // discoveries were not recorded) and must reach the operator.
        let outcome = merge::merge(
            vec![search_stream, aggregator_stream, procurement_stream, page_stream],
            &mut seen,
            result_log.records(),
        );
        stats.new_items = outcome.new_items.len();
        run_log.log(EventKind::Merge {
            seen_total: seen.len(),
            new_items: outcome.new_items.len(),
            log_size: outcome.updated_log.len(),
        });

        result_log.replace(outcome.updated_log);
        if let Err(e) = result_log
            .save(&self.store)
            .and_then(|()| seen.save(&self.store))
        {
            error!(
                error = %e,
                "Query state was committed but discoveries were not persisted; \
                 this run's findings will be re-reported by the next run"
            );
            return Err(e.into());
        }

        // Notification is last: a mail failure after persistence loses a
        // message, never state.
        let to_notify = notify::filter_for_notification(&outcome.new_items, now);
        stats.notified = to_notify.len();
        stats.notification_sent = if to_notify.is_empty() {
            info!(
                new_items = outcome.new_items.len(),
                "No new items inside the notification window"
            );
            false
        } else {
            match self.deps.notifier.notify(&to_notify).await {
                Ok(sent) => sent,
                Err(e) => {
                    warn!(error = %e, "Notifier failed");
                    false
                }
            }
        };
        run_log.log(EventKind::Notification {
            considered: outcome.new_items.len(),
            notified: to_notify.len(),
            sent: stats.notification_sent,
        });

        if let Err(e) = run_log.save(self.store.dir(), &stats) {
            warn!(error = %e, "Failed to save run log");
        }

        Ok(stats)
    }
}
