use std::collections::BTreeSet;

use mobiwatch_common::MobiwatchError;

use super::{JsonStore, StoreKey};

/// URLs observed in any prior run. Append-only for the lifetime of the
/// system; nothing is ever pruned. Persisted as a sorted JSON list.
#[derive(Debug, Default)]
pub struct SeenUrlStore {
    urls: BTreeSet<String>,
}

impl SeenUrlStore {
    pub fn load(store: &JsonStore) -> Result<Self, MobiwatchError> {
        let urls: Vec<String> = store.load(StoreKey::SeenUrls)?.unwrap_or_default();
        Ok(Self {
            urls: urls.into_iter().collect(),
        })
    }

    pub fn save(&self, store: &JsonStore) -> Result<(), MobiwatchError> {
        store.save(StoreKey::SeenUrls, &self.urls)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_as_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut seen = SeenUrlStore::default();
        seen.insert("http://b.example");
        seen.insert("http://a.example");
        seen.save(&store).unwrap();

        let reloaded = SeenUrlStore::load(&store).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("http://a.example"));
        assert!(reloaded.contains("http://b.example"));
    }

    #[test]
    fn insert_reports_novelty() {
        let mut seen = SeenUrlStore::default();
        assert!(seen.insert("http://a.example"));
        assert!(!seen.insert("http://a.example"));
    }
}
