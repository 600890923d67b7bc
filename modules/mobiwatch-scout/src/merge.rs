//! Cross-run novelty: combines the heterogeneous fetch streams into one
//! deduplicated list, splits out what has never been seen in any prior run,
//! and grows the append-only stores. Nothing is ever deleted here.

use std::collections::HashSet;

use tracing::{debug, info};

use mobiwatch_common::ResultRecord;

use crate::store::SeenUrlStore;

/// Outcome of merging one run's fetch streams against history.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The full persisted log for this run: genuinely new URLs prepended to
    /// the historical log, deduplicated by URL, first occurrence kept.
    pub updated_log: Vec<ResultRecord>,
    /// Records whose URL was absent from the seen store before this run.
    pub new_items: Vec<ResultRecord>,
}

/// Merge result streams against the seen-URL store and the persisted log.
///
/// `streams` must be passed in priority order: generic search first, then
/// aggregator/procurement results, then page-watch results. When the same
/// URL appears in two streams within one run, the first occurrence wins and
/// later duplicates are dropped silently. Records without a URL have no
/// natural key and are dropped.
///
/// Every URL encountered this run, new or repeat, is added to `seen` before
/// returning: seen-ness is run-granular, so an item is "new" relative to all
/// prior runs, never relative to an earlier stream of the same run.
pub fn merge(
    streams: Vec<Vec<ResultRecord>>,
    seen: &mut SeenUrlStore,
    previous_log: &[ResultRecord],
) -> MergeOutcome {
    let mut run_urls: HashSet<String> = HashSet::new();
    let mut new_items: Vec<ResultRecord> = Vec::new();

    for record in streams.into_iter().flatten() {
        if record.url.is_empty() {
            debug!(title = %record.title, source = %record.source, "Dropping record without URL");
            continue;
        }
        if !run_urls.insert(record.url.clone()) {
            continue; // intra-run duplicate, first occurrence already kept
        }
        if !seen.contains(&record.url) {
            new_items.push(record);
        }
    }

    // New discoveries go in front; a URL already in the historical log keeps
    // its original record, so the log orders by first discovery.
    let mut log_urls: HashSet<&str> = HashSet::new();
    let mut updated_log: Vec<ResultRecord> = Vec::with_capacity(new_items.len() + previous_log.len());
    for record in new_items.iter().chain(previous_log.iter()) {
        if log_urls.insert(record.url.as_str()) {
            updated_log.push(record.clone());
        }
    }

    for url in &run_urls {
        seen.insert(url);
    }

    info!(
        encountered = run_urls.len(),
        new_items = new_items.len(),
        log_size = updated_log.len(),
        "Merge complete"
    );

    MergeOutcome {
        updated_log,
        new_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobiwatch_common::ResultSource;

    fn record(url: &str, source: ResultSource) -> ResultRecord {
        ResultRecord::new(format!("title for {url}"), url, source)
    }

    #[test]
    fn new_urls_are_split_from_seen_ones() {
        let mut seen = SeenUrlStore::default();
        seen.insert("http://seen.com");

        let streams = vec![vec![
            record("http://seen.com", ResultSource::Search),
            record("http://new.com", ResultSource::Search),
        ]];
        let outcome = merge(streams, &mut seen, &[]);

        assert_eq!(outcome.new_items.len(), 1);
        assert_eq!(outcome.new_items[0].url, "http://new.com");
    }

    #[test]
    fn first_stream_wins_for_duplicate_urls() {
        let mut seen = SeenUrlStore::default();
        let generic = vec![record("http://e.com", ResultSource::Search)];
        let site = vec![record("http://e.com", ResultSource::Aggregator("njss".into()))];

        let outcome = merge(vec![generic, site], &mut seen, &[]);

        assert_eq!(outcome.new_items.len(), 1);
        assert_eq!(outcome.new_items[0].source, ResultSource::Search);
        assert_eq!(outcome.updated_log.len(), 1);
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let mut seen = SeenUrlStore::default();
        let stream = vec![record("http://a.com", ResultSource::Search)];

        let first = merge(vec![stream.clone()], &mut seen, &[]);
        assert_eq!(first.new_items.len(), 1);

        let second = merge(vec![stream], &mut seen, &first.updated_log);
        assert!(second.new_items.is_empty());
        assert_eq!(second.updated_log.len(), 1);
    }

    #[test]
    fn log_never_shrinks_or_loses_urls() {
        let mut seen = SeenUrlStore::default();
        let old_log = vec![
            record("http://old1.com", ResultSource::Kkj),
            record("http://old2.com", ResultSource::Direct),
        ];

        let outcome = merge(
            vec![vec![record("http://new.com", ResultSource::Search)]],
            &mut seen,
            &old_log,
        );

        assert_eq!(outcome.updated_log.len(), 3);
        for old in &old_log {
            assert!(
                outcome.updated_log.iter().any(|r| r.url == old.url),
                "lost {}",
                old.url
            );
        }
        // Newest discovery leads the log.
        assert_eq!(outcome.updated_log[0].url, "http://new.com");
    }

    #[test]
    fn historical_record_is_not_overwritten_by_a_fresh_fetch() {
        let mut seen = SeenUrlStore::default();
        seen.insert("http://a.com");
        let old = record("http://a.com", ResultSource::Kkj);
        let fresh = record("http://a.com", ResultSource::Search);

        let outcome = merge(vec![vec![fresh]], &mut seen, &[old]);

        // The repeat URL is not new, and the log keeps the historical record.
        assert!(outcome.new_items.is_empty());
        assert_eq!(outcome.updated_log.len(), 1);
        assert_eq!(outcome.updated_log[0].source, ResultSource::Kkj);
    }

    #[test]
    fn every_encountered_url_becomes_seen() {
        let mut seen = SeenUrlStore::default();
        seen.insert("http://seen.com");

        merge(
            vec![vec![
                record("http://seen.com", ResultSource::Search),
                record("http://new.com", ResultSource::Search),
            ]],
            &mut seen,
            &[],
        );

        assert!(seen.contains("http://seen.com"));
        assert!(seen.contains("http://new.com"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn records_without_urls_are_dropped() {
        let mut seen = SeenUrlStore::default();
        let outcome = merge(
            vec![vec![record("", ResultSource::Search)]],
            &mut seen,
            &[],
        );
        assert!(outcome.new_items.is_empty());
        assert!(outcome.updated_log.is_empty());
        assert!(seen.is_empty());
    }
}
