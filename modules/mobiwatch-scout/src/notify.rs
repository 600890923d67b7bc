//! Notification policy: which of the new items are worth an email, in what
//! order, and how the message reads. Presentation only: records excluded
//! here stay in the result log and are never re-notified later.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use mobiwatch_common::ResultRecord;
use resend_client::{OutboundEmail, ResendClient};

use crate::traits::Notifier;

/// Only items updated within this many hours of the run are notified.
pub const NOTIFY_WINDOW_HOURS: i64 = 24;

/// True when `update_date` falls inside the recency window. Date-only values
/// are anchored at midnight UTC. A missing date never passes: such items
/// are logged as new but never trigger a message, a deliberate gap in the
/// product rather than a fallback to notify-everything.
pub fn within_window(update_date: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    let Some(date) = update_date else {
        return false;
    };
    let Some(stamp) = date.and_hms_opt(0, 0, 0) else {
        return false;
    };
    now - stamp.and_utc() <= Duration::hours(NOTIFY_WINDOW_HOURS)
}

/// Filter new items down to the notification subset: inside the recency
/// window, newest update first, dateless records last (empty sort key).
pub fn filter_for_notification(
    new_items: &[ResultRecord],
    now: DateTime<Utc>,
) -> Vec<ResultRecord> {
    let mut recent: Vec<ResultRecord> = new_items
        .iter()
        .filter(|r| within_window(r.update_date, now))
        .cloned()
        .collect();
    recent.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    recent
}

fn sort_key(record: &ResultRecord) -> String {
    record
        .update_date
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// Render the notification email. Items arrive already filtered and sorted.
pub fn build_email(items: &[ResultRecord]) -> (String, String) {
    let subject = format!(
        "[mobiwatch] {} new procurement match{} in the last 24h",
        items.len(),
        if items.len() == 1 { "" } else { "es" }
    );

    let mut lines = vec![
        "Newly discovered shared-mobility procurement items, updated within the last 24 hours.".to_string(),
        String::new(),
        "=".repeat(50),
    ];

    for (i, item) in items.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("#{} {}", i + 1, item.title));
        if let Some(org) = &item.organization {
            lines.push(format!("Organization: {org}"));
        }
        if let Some(prefecture) = &item.prefecture {
            lines.push(format!("Prefecture: {prefecture}"));
        }
        if let Some(date) = item.update_date {
            lines.push(format!("Updated: {date}"));
        }
        if let Some(deadline) = &item.deadline {
            lines.push(format!("Deadline: {deadline}"));
        }
        lines.push(format!("URL: {}", item.url));
        lines.push("-".repeat(30));
    }

    lines.push(String::new());
    lines.push("Full history is on the dashboard.".to_string());

    (subject, lines.join("\n"))
}

/// Email delivery via Resend. Send failures are absorbed (logged, reported
/// as not-sent); a flaky mail provider must not fail the run after state
/// has already been committed.
pub struct EmailNotifier {
    client: ResendClient,
    from: String,
    to: String,
}

impl EmailNotifier {
    pub fn new(client: ResendClient, from: String, to: String) -> Self {
        Self { client, from, to }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, items: &[ResultRecord]) -> Result<bool> {
        if items.is_empty() {
            return Ok(false);
        }
        let (subject, body) = build_email(items);
        let email = OutboundEmail {
            from: self.from.clone(),
            to: vec![self.to.clone()],
            subject,
            text: body,
        };
        match self.client.send(&email).await {
            Ok(id) => {
                info!(message_id = %id, items = items.len(), "Notification sent");
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Notification send failed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobiwatch_common::ResultSource;

    fn record(url: &str, update_date: Option<NaiveDate>) -> ResultRecord {
        let mut record = ResultRecord::new("title", url, ResultSource::Search);
        record.update_date = update_date;
        record
    }

    #[test]
    fn items_inside_the_window_pass() {
        let now = "2026-01-05T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(within_window(NaiveDate::from_ymd_opt(2026, 1, 5), now));
        // Midnight of the previous day is exactly 36h back, outside.
        assert!(!within_window(NaiveDate::from_ymd_opt(2026, 1, 4), now));
        assert!(!within_window(NaiveDate::from_ymd_opt(2025, 12, 1), now));
    }

    #[test]
    fn dateless_items_never_pass() {
        assert!(!within_window(None, Utc::now()));
    }

    #[test]
    fn future_dates_pass() {
        // A page stamped tomorrow (timezone skew) still gets notified.
        let now = "2026-01-05T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(within_window(NaiveDate::from_ymd_opt(2026, 1, 6), now));
    }

    #[test]
    fn filter_keeps_only_recent_and_sorts_newest_first() {
        let now = "2026-01-05T20:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let items = vec![
            record("http://old.com", NaiveDate::from_ymd_opt(2025, 11, 1)),
            record("http://today.com", NaiveDate::from_ymd_opt(2026, 1, 5)),
            record("http://dateless.com", None),
            record("http://tomorrow.com", NaiveDate::from_ymd_opt(2026, 1, 6)),
        ];

        let filtered = filter_for_notification(&items, now);
        let urls: Vec<&str> = filtered.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://tomorrow.com", "http://today.com"]);
    }

    #[test]
    fn email_lists_every_item_with_its_fields() {
        let mut item = record("http://a.com", NaiveDate::from_ymd_opt(2026, 1, 5));
        item.organization = Some("横浜市".to_string());
        item.deadline = Some("2026-02-01".to_string());

        let (subject, body) = build_email(&[item]);
        assert!(subject.contains("1 new procurement match"));
        assert!(body.contains("Organization: 横浜市"));
        assert!(body.contains("Deadline: 2026-02-01"));
        assert!(body.contains("URL: http://a.com"));
    }
}
