//! Budgeted query scheduling: turns the topic × action cross product, the
//! per-site probes and the time-boxed event queries into one bounded,
//! fairly-rotated batch per run.

pub mod budget;
pub mod scorer;
pub mod selector;

pub use budget::Budget;
pub use scorer::PriorityScorer;
pub use selector::{QuerySelector, SelectedQueries, SiteSelection};
