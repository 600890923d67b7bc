use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobiwatch_common::MobiwatchError;

use super::{JsonStore, StoreKey};

/// Last-run bookkeeping for one query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub last_run: DateTime<Utc>,
}

/// The scheduler's only cross-invocation memory: query string → when it last
/// ran. An absent entry means "never run" and is treated as maximally stale.
/// Entries are created on first selection and only ever move forward in time.
#[derive(Debug, Default)]
pub struct QueryStateStore {
    entries: BTreeMap<String, QueryState>,
}

impl QueryStateStore {
    pub fn load(store: &JsonStore) -> Result<Self, MobiwatchError> {
        Ok(Self {
            entries: store.load(StoreKey::QueryState)?.unwrap_or_default(),
        })
    }

    pub fn save(&self, store: &JsonStore) -> Result<(), MobiwatchError> {
        store.save(StoreKey::QueryState, &self.entries)
    }

    pub fn last_run(&self, query: &str) -> Option<DateTime<Utc>> {
        self.entries.get(query).map(|s| s.last_run)
    }

    /// Stamp a query as run. `last_run` is monotone: an earlier timestamp
    /// never overwrites a later one.
    pub fn mark_run(&mut self, query: &str, now: DateTime<Utc>) {
        match self.entries.get_mut(query) {
            Some(state) if state.last_run >= now => {}
            Some(state) => state.last_run = now,
            None => {
                self.entries
                    .insert(query.to_string(), QueryState { last_run: now });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn unknown_query_has_no_last_run() {
        let state = QueryStateStore::default();
        assert!(state.last_run("never ran").is_none());
    }

    #[test]
    fn mark_run_is_monotone() {
        let mut state = QueryStateStore::default();
        let now = Utc::now();

        state.mark_run("q", now);
        assert_eq!(state.last_run("q"), Some(now));

        // A later stamp advances, an earlier one is ignored.
        let later = now + Duration::hours(1);
        state.mark_run("q", later);
        assert_eq!(state.last_run("q"), Some(later));

        state.mark_run("q", now);
        assert_eq!(state.last_run("q"), Some(later));
    }

    #[test]
    fn persists_rfc3339_mapping_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut state = QueryStateStore::default();
        let now = "2026-01-05T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        state.mark_run("シェアサイクル 公募", now);
        state.save(&store).unwrap();

        let raw = std::fs::read_to_string(store.path(StoreKey::QueryState)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value["シェアサイクル 公募"]["last_run"],
            "2026-01-05T09:00:00Z"
        );

        let reloaded = QueryStateStore::load(&store).unwrap();
        assert_eq!(reloaded.last_run("シェアサイクル 公募"), Some(now));
    }
}
