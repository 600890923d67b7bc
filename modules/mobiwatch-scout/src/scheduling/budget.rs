use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mobiwatch_common::MobiwatchError;

/// Queries a site gets per run when the allocation map has no entry for it.
pub const DEFAULT_SITE_ALLOCATION: usize = 4;

/// Per-run query caps, partitioned by category so no category can starve
/// another. The search provider enforces `daily_limit`; everything else here
/// exists to stay under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub daily_limit: usize,
    pub runs_per_day: usize,
    pub per_run: usize,
    /// category name ("generic", "event", or a site name) → cap.
    pub allocation: BTreeMap<String, usize>,
}

impl Budget {
    /// The deployment default: the provider's 100-query free tier split
    /// across four runs a day.
    pub fn builtin() -> Self {
        Self {
            daily_limit: 100,
            runs_per_day: 4,
            per_run: 25,
            allocation: BTreeMap::from([
                ("generic".to_string(), 13),
                ("njss".to_string(), 4),
                ("nyusatsu-king".to_string(), 4),
                ("event".to_string(), 4),
            ]),
        }
    }

    /// Reject budgets that could exceed the provider quota. Checked once at
    /// startup; a bad budget must never be partially applied.
    pub fn validate(&self) -> Result<(), MobiwatchError> {
        let allocated: usize = self.allocation.values().sum();
        if allocated > self.per_run {
            return Err(MobiwatchError::Budget(format!(
                "allocation total {allocated} exceeds per_run {}",
                self.per_run
            )));
        }
        if self.per_run * self.runs_per_day > self.daily_limit {
            return Err(MobiwatchError::Budget(format!(
                "per_run {} x runs_per_day {} exceeds daily_limit {}",
                self.per_run, self.runs_per_day, self.daily_limit
            )));
        }
        Ok(())
    }

    /// Cap for a named category. Unknown categories get nothing.
    pub fn for_category(&self, category: &str) -> usize {
        self.allocation.get(category).copied().unwrap_or(0)
    }

    /// Cap for an aggregator site; sites without an explicit entry get the
    /// default.
    pub fn for_site(&self, site: &str) -> usize {
        self.allocation
            .get(site)
            .copied()
            .unwrap_or(DEFAULT_SITE_ALLOCATION)
    }
}
