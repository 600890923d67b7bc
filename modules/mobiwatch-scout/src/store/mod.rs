//! Persisted stores: whole-file JSON under the data directory, one file per
//! key. Single writer, read-modify-write; there is no locking beyond "do not
//! run two instances against the same directory".

pub mod query_state;
pub mod result_log;
pub mod seen_urls;

pub use query_state::{QueryState, QueryStateStore};
pub use result_log::ResultLog;
pub use seen_urls::SeenUrlStore;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use mobiwatch_common::MobiwatchError;

/// The three persisted files the system owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    QueryState,
    SeenUrls,
    ResultLog,
}

impl StoreKey {
    fn file_name(self) -> &'static str {
        match self {
            StoreKey::QueryState => "query_state.json",
            StoreKey::SeenUrls => "seen_urls.json",
            StoreKey::ResultLog => "results.json",
        }
    }
}

/// Whole-file JSON persistence. Writes go through a temp file in the same
/// directory and are renamed into place, so a failed run leaves the previous
/// file intact. There is no partial-state persistence.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Load one store file. A missing or empty file is `None` (first run,
    /// never fatal). A present but unparsable file is a corruption error,
    /// never silently reset, since a reset would mark every query unrun and
    /// blow the daily quota on the next run.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, MobiwatchError> {
        let path = self.path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MobiwatchError::Io(e)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| MobiwatchError::CorruptState {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Replace one store file atomically.
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), MobiwatchError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(key);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, value)
            .map_err(|e| MobiwatchError::Persistence(format!("serialize {}: {e}", path.display())))?;
        tmp.persist(&path)
            .map_err(|e| MobiwatchError::Persistence(format!("replace {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Store file saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let loaded: Option<Vec<String>> = store.load(StoreKey::SeenUrls).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn empty_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        fs::write(store.path(StoreKey::QueryState), "  \n").unwrap();
        let loaded: Option<BTreeMap<String, String>> = store.load(StoreKey::QueryState).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn corrupt_file_is_fatal_not_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        fs::write(store.path(StoreKey::QueryState), "{not json").unwrap();
        let err = store
            .load::<BTreeMap<String, String>>(StoreKey::QueryState)
            .unwrap_err();
        assert!(matches!(err, MobiwatchError::CorruptState { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let urls = vec!["http://a.example".to_string(), "http://b.example".to_string()];
        store.save(StoreKey::SeenUrls, &urls).unwrap();
        let loaded: Option<Vec<String>> = store.load(StoreKey::SeenUrls).unwrap();
        assert_eq!(loaded.unwrap(), urls);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store.save(StoreKey::SeenUrls, &vec!["http://a.example"]).unwrap();
        store.save(StoreKey::SeenUrls, &vec!["http://b.example"]).unwrap();
        let loaded: Vec<String> = store.load(StoreKey::SeenUrls).unwrap().unwrap();
        assert_eq!(loaded, vec!["http://b.example"]);
    }
}
