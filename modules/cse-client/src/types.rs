use serde::Deserialize;

/// Top-level Custom Search response. Only the organic items matter;
/// queries without results omit the field entirely.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One organic search result.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_response_with_items() {
        let json = r#"{
            "items": [
                {"title": "入札公告", "link": "https://example.lg.jp/a", "snippet": "Dec 4, 2025 ... 公募"},
                {"title": "no snippet", "link": "https://example.lg.jp/b"}
            ]
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].link, "https://example.lg.jp/a");
        assert_eq!(resp.items[1].snippet, "");
    }

    #[test]
    fn parses_empty_response() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.items.is_empty());
    }
}
