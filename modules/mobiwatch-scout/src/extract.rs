//! Regex extraction over the messy text the sources hand back: update dates
//! buried in snippets and page bodies, prefecture names, page titles.

use chrono::NaiveDate;
use regex::Regex;

use mobiwatch_common::catalogs;

/// Parse a date from a search snippet. Handles the three formats the
/// sources actually emit: a leading English date (`Dec 4, 2025`), the
/// Japanese form (`2025年12月24日`), and slashes (`2025/12/24`).
pub fn extract_snippet_date(snippet: &str) -> Option<NaiveDate> {
    let english = Regex::new(r"^([A-Z][a-z]{2}) (\d{1,2}), (\d{4})").expect("valid regex");
    if let Some(cap) = english.captures(snippet) {
        let month = month_number(&cap[1])?;
        return NaiveDate::from_ymd_opt(
            cap[3].parse().ok()?,
            month,
            cap[2].parse().ok()?,
        );
    }

    let japanese = Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日").expect("valid regex");
    if let Some(cap) = japanese.captures(snippet) {
        return ymd(&cap);
    }

    let slashed = Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").expect("valid regex");
    if let Some(cap) = slashed.captures(snippet) {
        return ymd(&cap);
    }

    None
}

/// Pull an update date out of a watched page: labelled update stamps in the
/// body text first, then `lastmod` / `article:modified_time` meta tags.
pub fn extract_page_date(html: &str, text: &str) -> Option<NaiveDate> {
    let patterns = [
        r"更新日[：:]\s*(\d{4})年(\d{1,2})月(\d{1,2})日",
        r"最終更新[：:]\s*(\d{4})年(\d{1,2})月(\d{1,2})日",
        r"更新日[：:]\s*(\d{4})/(\d{1,2})/(\d{1,2})",
        r"(\d{4})年(\d{1,2})月(\d{1,2})日\s*更新",
        r"(\d{4})-(\d{2})-(\d{2})",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            if let Some(date) = ymd(&cap) {
                return Some(date);
            }
        }
    }

    let meta = Regex::new(
        r#"<meta[^>]+(?:name="lastmod"|property="article:modified_time")[^>]+content="([^"]+)""#,
    )
    .expect("valid regex");
    if let Some(cap) = meta.captures(html) {
        let content = &cap[1];
        if content.len() >= 10 {
            if let Ok(date) = NaiveDate::parse_from_str(&content[..10], "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    None
}

/// First monitored region name appearing in the text, if any.
pub fn extract_prefecture(text: &str) -> Option<String> {
    catalogs::target_prefectures()
        .into_iter()
        .find(|keyword| text.contains(keyword))
        .map(|keyword| keyword.to_string())
}

/// `<title>` contents, whitespace-trimmed.
pub fn extract_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>([^<]*)</title>").expect("valid regex");
    re.captures(html)
        .map(|cap| cap[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Strip markup down to whitespace-normalized text. Script and style bodies
/// go first so their contents never match a keyword.
pub fn strip_tags(html: &str) -> String {
    let script = Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex");
    let style = Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex");
    let tag = Regex::new(r"(?s)<[^>]+>").expect("valid regex");
    let whitespace = Regex::new(r"\s+").expect("valid regex");

    let text = script.replace_all(html, " ");
    let text = style.replace_all(&text, " ");
    let text = tag.replace_all(&text, " ");
    whitespace.replace_all(&text, " ").trim().to_string()
}

/// First `max_chars` characters with an ellipsis, respecting char
/// boundaries (the sources are mostly multi-byte text).
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

fn ymd(cap: &regex::Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        cap[1].parse().ok()?,
        cap[2].parse().ok()?,
        cap[3].parse().ok()?,
    )
}

fn month_number(abbrev: &str) -> Option<u32> {
    match abbrev {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}
