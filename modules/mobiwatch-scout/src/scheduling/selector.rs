use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::info;

use mobiwatch_common::{Catalogs, MobiwatchError};

use crate::scheduling::budget::Budget;
use crate::scheduling::scorer::{staleness_days, PriorityScorer, STALENESS_FACTOR};
use crate::store::{JsonStore, QueryStateStore};

/// Queries chosen for one run, grouped the way the fetch collaborators are
/// invoked: one generic-search bucket (combination queries followed by event
/// queries) and one bucket per aggregator site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedQueries {
    pub general: Vec<String>,
    pub sites: Vec<SiteSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelection {
    pub site: String,
    pub queries: Vec<String>,
}

impl SelectedQueries {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.general
            .iter()
            .chain(self.sites.iter().flat_map(|s| s.queries.iter()))
    }

    pub fn total(&self) -> usize {
        self.general.len() + self.sites.iter().map(|s| s.queries.len()).sum::<usize>()
    }
}

/// Picks the per-run query batch. Categories are scored and capped
/// independently; they never compete for each other's allocation.
pub struct QuerySelector<'a> {
    catalogs: &'a Catalogs,
    budget: &'a Budget,
}

impl<'a> QuerySelector<'a> {
    pub fn new(catalogs: &'a Catalogs, budget: &'a Budget) -> Self {
        Self { catalogs, budget }
    }

    /// Pure selection: no store mutation, no I/O. Deterministic for a fixed
    /// state snapshot and `now`. Scoring ties are broken by generation
    /// order (topics outer, actions inner, both in catalog order) via the
    /// stable sort.
    pub fn select(&self, state: &QueryStateStore, now: DateTime<Utc>) -> SelectedQueries {
        let scorer = PriorityScorer::new(&self.catalogs.topics, &self.catalogs.actions);

        // Generic: the full topic x action cross product.
        let mut scored: Vec<(String, f64)> = self
            .catalogs
            .topics
            .iter()
            .flat_map(|topic| {
                self.catalogs
                    .actions
                    .iter()
                    .map(move |action| format!("{} {}", topic.text, action.text))
            })
            .map(|query| {
                let score = scorer.score(&query, state, now);
                (query, score)
            })
            .collect();
        sort_by_score_desc(&mut scored);
        let mut general: Vec<String> = scored
            .into_iter()
            .take(self.budget.for_category("generic"))
            .map(|(query, _)| query)
            .collect();

        // Per-site: one domain-scoped query per topic, no action component.
        let sites: Vec<SiteSelection> = self
            .catalogs
            .sites
            .iter()
            .map(|site| {
                let mut scored: Vec<(String, f64)> = self
                    .catalogs
                    .topics
                    .iter()
                    .map(|topic| {
                        let query = format!("site:{} {}", site.domain, topic.text);
                        let score = scorer.score(&query, state, now);
                        (query, score)
                    })
                    .collect();
                sort_by_score_desc(&mut scored);
                SiteSelection {
                    site: site.name.clone(),
                    queries: scored
                        .into_iter()
                        .take(self.budget.for_site(&site.name))
                        .map(|(query, _)| query)
                        .collect(),
                }
            })
            .collect();

        // Event queries have no topic/action decomposition; staleness is the
        // whole score. They ride in the generic-search bucket.
        let mut scored: Vec<(String, f64)> = self
            .catalogs
            .event_queries
            .iter()
            .map(|query| {
                let score = staleness_days(state.last_run(query), now) * STALENESS_FACTOR;
                (query.clone(), score)
            })
            .collect();
        sort_by_score_desc(&mut scored);
        general.extend(
            scored
                .into_iter()
                .take(self.budget.for_category("event"))
                .map(|(query, _)| query),
        );

        SelectedQueries { general, sites }
    }

    /// Stamp every selected query with the single run timestamp.
    pub fn mark_selected(
        &self,
        state: &mut QueryStateStore,
        selected: &SelectedQueries,
        now: DateTime<Utc>,
    ) {
        for query in selected.all() {
            state.mark_run(query, now);
        }
    }

    /// Select, stamp, and atomically persist the updated state. The state
    /// file is committed before any fetch happens, so a crashed run costs
    /// staleness bonus rather than quota.
    pub fn select_for_run(
        &self,
        store: &JsonStore,
        state: &mut QueryStateStore,
        now: DateTime<Utc>,
    ) -> Result<SelectedQueries, MobiwatchError> {
        let selected = self.select(state, now);
        self.mark_selected(state, &selected, now);
        state.save(store)?;
        info!(
            general = selected.general.len(),
            site_buckets = selected.sites.len(),
            total = selected.total(),
            per_run = self.budget.per_run,
            "Query selection committed"
        );
        Ok(selected)
    }
}

fn sort_by_score_desc(scored: &mut [(String, f64)]) {
    // Stable: equal scores keep generation order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}
