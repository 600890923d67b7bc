use mobiwatch_common::{MobiwatchError, ResultRecord};

use super::{JsonStore, StoreKey};

/// Every record ever merged in, newest-known-first, deduplicated by URL.
/// There is no eviction policy; growth is unbounded and left to the
/// operator to monitor.
#[derive(Debug, Default)]
pub struct ResultLog {
    records: Vec<ResultRecord>,
}

impl ResultLog {
    pub fn load(store: &JsonStore) -> Result<Self, MobiwatchError> {
        Ok(Self {
            records: store.load(StoreKey::ResultLog)?.unwrap_or_default(),
        })
    }

    pub fn save(&self, store: &JsonStore) -> Result<(), MobiwatchError> {
        store.save(StoreKey::ResultLog, &self.records)
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Swap in the merged log for this run.
    pub fn replace(&mut self, records: Vec<ResultRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobiwatch_common::ResultSource;

    #[test]
    fn round_trips_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut log = ResultLog::default();
        log.replace(vec![ResultRecord::new(
            "title",
            "http://a.example",
            ResultSource::Search,
        )]);
        log.save(&store).unwrap();

        let reloaded = ResultLog::load(&store).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0].url, "http://a.example");
    }
}
