use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// --- Catalog value objects ---

/// A weighted search term. Topics and actions are two disjoint catalogs of
/// these; a higher weight means the term is searched more often.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub text: String,
    pub weight: u32,
}

impl Term {
    pub fn new(text: impl Into<String>, weight: u32) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// A procurement aggregator reachable via a domain-scoped search
/// (`site:{domain} {topic}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteTarget {
    pub name: String,
    pub domain: String,
}

impl SiteTarget {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }
}

// --- Result records ---

/// Where a result record came from. Aggregator results carry the site name
/// so the serialized form stays a plain string (`"njss"`, not a wrapper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Generic government-site search.
    Search,
    /// Government procurement portal API.
    Kkj,
    /// Directly watched page.
    Direct,
    /// Domain-scoped search against a procurement aggregator.
    #[serde(untagged)]
    Aggregator(String),
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSource::Search => write!(f, "search"),
            ResultSource::Kkj => write!(f, "kkj"),
            ResultSource::Direct => write!(f, "direct"),
            ResultSource::Aggregator(name) => write!(f, "{name}"),
        }
    }
}

/// One discovered item. The URL is the natural key everywhere: intra-run
/// dedup, the seen-URL store, and the persisted result log all compare on
/// it. Records from different sources describing the same real-world item
/// are never merged; the first one under the merge order wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<String>,
    pub source: ResultSource,
    pub fetched_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Minimal record with the current fetch timestamp. Fetchers fill in
    /// whatever else their source provides.
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: ResultSource) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
            organization: None,
            prefecture: None,
            update_date: None,
            deadline: None,
            matched_keywords: Vec::new(),
            source,
            fetched_at: Utc::now(),
        }
    }
}
