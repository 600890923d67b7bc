//! Run log: persisted JSON timeline of what one invocation actually did.
//!
//! Each run writes a single `{data_dir}/runs/{run_id}.json` with an ordered
//! list of events. Diagnostic only; the scheduler never reads these back.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::scout::RunStats;

pub struct RunLog {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    events: Vec<RunEvent>,
    seq: u32,
}

#[derive(Serialize)]
struct RunEvent {
    seq: u32,
    ts: DateTime<Utc>,
    #[serde(flatten)]
    kind: EventKind,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    QuerySelection {
        general: usize,
        site_buckets: usize,
        total: usize,
    },
    SearchQuery {
        query: String,
        source: String,
        result_count: usize,
    },
    ProcurementQuery {
        query: String,
        result_count: usize,
    },
    PageWatch {
        url: String,
        matched: bool,
    },
    Merge {
        seen_total: usize,
        new_items: usize,
        log_size: usize,
    },
    Notification {
        considered: usize,
        notified: usize,
        sent: bool,
    },
}

impl RunLog {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            events: Vec::new(),
            seq: 0,
        }
    }

    pub fn log(&mut self, kind: EventKind) {
        self.events.push(RunEvent {
            seq: self.seq,
            ts: Utc::now(),
            kind,
        });
        self.seq += 1;
    }

    /// Serialize the run log to JSON and write to disk.
    /// Returns the file path on success.
    pub fn save(&self, data_dir: &Path, stats: &RunStats) -> Result<PathBuf> {
        let dir = data_dir.join("runs");
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.json", self.run_id));

        let output = SerializedRunLog {
            run_id: &self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            stats,
            events: &self.events,
        };

        std::fs::write(&path, serde_json::to_string_pretty(&output)?)?;
        info!(path = %path.display(), events = self.events.len(), "Run log saved");

        Ok(path)
    }
}

#[derive(Serialize)]
struct SerializedRunLog<'a> {
    run_id: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    stats: &'a RunStats,
    events: &'a [RunEvent],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_an_ordered_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RunLog::new("test-run".to_string());
        log.log(EventKind::SearchQuery {
            query: "シェアサイクル 公募".to_string(),
            source: "search".to_string(),
            result_count: 3,
        });
        log.log(EventKind::Merge {
            seen_total: 3,
            new_items: 1,
            log_size: 1,
        });

        let path = log.save(dir.path(), &RunStats::default()).unwrap();
        let raw = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["run_id"], "test-run");
        assert_eq!(value["events"][0]["seq"], 0);
        assert_eq!(value["events"][0]["type"], "search_query");
        assert_eq!(value["events"][1]["type"], "merge");
    }
}
