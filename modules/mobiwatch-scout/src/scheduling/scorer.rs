use chrono::{DateTime, Utc};

use mobiwatch_common::Term;

use crate::store::QueryStateStore;

/// Staleness credited to a query that has never run, in days.
pub const NEVER_RUN_DAYS: f64 = 30.0;

/// Score added per day since a query last ran. The staleness term is linear
/// and unbounded, so an idle query eventually outscores any weight rival;
/// no query can be starved forever.
pub const STALENESS_FACTOR: f64 = 0.5;

/// Recency-aware priority for query strings. Weights come from the first
/// topic and first action (catalog order) whose text appears in the query;
/// site queries carry no action text and so compete on topic weight and
/// staleness alone.
pub struct PriorityScorer<'a> {
    topics: &'a [Term],
    actions: &'a [Term],
}

impl<'a> PriorityScorer<'a> {
    pub fn new(topics: &'a [Term], actions: &'a [Term]) -> Self {
        Self { topics, actions }
    }

    pub fn score(&self, query: &str, state: &QueryStateStore, now: DateTime<Utc>) -> f64 {
        let topic_weight = first_matching_weight(self.topics, query);
        let action_weight = first_matching_weight(self.actions, query);
        topic_weight + action_weight + staleness_days(state.last_run(query), now) * STALENESS_FACTOR
    }
}

/// Fractional days since `last_run`, or the never-run bonus.
pub fn staleness_days(last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match last_run {
        Some(t) => (now - t).num_seconds() as f64 / 86_400.0,
        None => NEVER_RUN_DAYS,
    }
}

fn first_matching_weight(terms: &[Term], query: &str) -> f64 {
    terms
        .iter()
        .find(|t| query.contains(&t.text))
        .map(|t| t.weight as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn terms(pairs: &[(&str, u32)]) -> Vec<Term> {
        pairs.iter().map(|(t, w)| Term::new(*t, *w)).collect()
    }

    #[test]
    fn never_run_gets_the_full_staleness_bonus() {
        let topics = terms(&[("alpha", 10)]);
        let actions = terms(&[("tender", 5)]);
        let scorer = PriorityScorer::new(&topics, &actions);
        let state = QueryStateStore::default();

        let score = scorer.score("alpha tender", &state, Utc::now());
        assert!((score - (10.0 + 5.0 + NEVER_RUN_DAYS * STALENESS_FACTOR)).abs() < 1e-9);
    }

    #[test]
    fn staleness_is_fractional_days() {
        let now = Utc::now();
        let half_day_ago = now - Duration::hours(12);
        let mut state = QueryStateStore::default();
        state.mark_run("q", half_day_ago);

        let days = staleness_days(state.last_run("q"), now);
        assert!((days - 0.5).abs() < 1e-6);
    }

    #[test]
    fn first_catalog_match_wins() {
        // Both topics appear in the query; the earlier catalog entry resolves
        // the weight even though the later one is heavier.
        let topics = terms(&[("cycle", 3), ("share cycle", 9)]);
        let actions = terms(&[]);
        let scorer = PriorityScorer::new(&topics, &actions);
        let state = QueryStateStore::default();

        let score = scorer.score("share cycle tender", &state, Utc::now());
        assert!((score - (3.0 + NEVER_RUN_DAYS * STALENESS_FACTOR)).abs() < 1e-9);
    }

    #[test]
    fn site_queries_carry_no_action_weight() {
        let topics = terms(&[("alpha", 10)]);
        let actions = terms(&[("tender", 5)]);
        let scorer = PriorityScorer::new(&topics, &actions);
        let state = QueryStateStore::default();

        let site = scorer.score("site:njss.info alpha", &state, Utc::now());
        let combo = scorer.score("alpha tender", &state, Utc::now());
        assert!((combo - site - 5.0).abs() < 1e-9);
    }

    #[test]
    fn older_query_eventually_outscores_equal_weight_rival() {
        // Fairness: q1 ran strictly before q2 with equal weights, so q1 must
        // score higher at any later observation point, and the gap must not
        // decay.
        let topics = terms(&[("alpha", 10)]);
        let actions = terms(&[("tender", 5)]);
        let scorer = PriorityScorer::new(&topics, &actions);

        let start = Utc::now();
        let mut state = QueryStateStore::default();
        state.mark_run("alpha tender", start);
        state.mark_run("alpha tender old", start - Duration::days(3));

        for days in [1, 10, 100] {
            let now = start + Duration::days(days);
            let young = scorer.score("alpha tender", &state, now);
            let old = scorer.score("alpha tender old", &state, now);
            assert!(
                old > young,
                "at +{days}d the older query must outrank: old={old} young={young}"
            );
        }
    }

    #[test]
    fn staleness_bonus_is_monotone_in_elapsed_time() {
        let now = Utc::now();
        let last_run = Some(now - Duration::days(1));
        let later = now + Duration::days(5);
        assert!(staleness_days(last_run, later) > staleness_days(last_run, now));
    }
}
