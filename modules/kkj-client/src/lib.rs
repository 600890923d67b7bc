pub mod error;
pub mod types;

pub use error::{KkjError, Result};
pub use types::ProcurementNotice;

use std::time::Duration;

use chrono::{Days, Utc};
use tracing::info;

const BASE_URL: &str = "https://www.kkj.go.jp/api/v1/";

pub struct KkjClient {
    client: reqwest::Client,
    base_url: String,
}

impl KkjClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Search tender notices by keyword, scoped to the given prefecture
    /// codes and to notices issued within the last `issued_within_days`.
    pub async fn search(
        &self,
        query: &str,
        lg_codes: &[&str],
        issued_within_days: u64,
    ) -> Result<Vec<ProcurementNotice>> {
        info!(query, lg_codes = lg_codes.len(), "KKJ search");

        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(issued_within_days))
            .unwrap_or(end);
        let issue_window = format!("{start}/{end}");

        let mut request = self.client.get(&self.base_url).query(&[
            ("Query", query),
            ("CFT_Issue_Date", issue_window.as_str()),
        ]);
        if !lg_codes.is_empty() {
            request = request.query(&[("LG_Code", lg_codes.join(",").as_str())]);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(KkjError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let notices = parse_response(&body)?;

        info!(query, count = notices.len(), "KKJ search complete");
        Ok(notices)
    }
}

impl Default for KkjClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the portal's XML response into notices. Entries without a project
/// name or document URL are dropped; they cannot be keyed or reported.
pub fn parse_response(xml: &str) -> Result<Vec<ProcurementNotice>> {
    let doc = roxmltree::Document::parse(xml)?;

    let mut notices = Vec::new();
    for result in doc
        .descendants()
        .filter(|n| n.has_tag_name("SearchResult"))
    {
        let text = |tag: &str| -> String {
            result
                .children()
                .find(|c| c.has_tag_name(tag))
                .and_then(|c| c.text())
                .unwrap_or("")
                .trim()
                .to_string()
        };

        let notice = ProcurementNotice {
            project_name: text("ProjectName"),
            document_url: text("ExternalDocumentURI"),
            organization: text("OrganizationName"),
            prefecture: text("PrefectureName"),
            category: text("Category"),
            issue_date: text("CftIssueDate"),
            deadline: text("PeriodEndTime"),
        };

        if !notice.project_name.is_empty() && !notice.document_url.is_empty() {
            notices.push(notice);
        }
    }

    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Results>
  <SearchResults>
    <SearchResult>
      <ProjectName>シェアサイクル事業委託</ProjectName>
      <ExternalDocumentURI>https://example.lg.jp/notice/1</ExternalDocumentURI>
      <OrganizationName>横浜市</OrganizationName>
      <PrefectureName>神奈川県</PrefectureName>
      <Category>役務</Category>
      <CftIssueDate>2026-01-05</CftIssueDate>
      <PeriodEndTime>2026-02-01</PeriodEndTime>
    </SearchResult>
    <SearchResult>
      <ProjectName>名前だけでURLなし</ProjectName>
    </SearchResult>
  </SearchResults>
</Results>"#;

    #[test]
    fn parses_search_results() {
        let notices = parse_response(SAMPLE).unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].project_name, "シェアサイクル事業委託");
        assert_eq!(notices[0].document_url, "https://example.lg.jp/notice/1");
        assert_eq!(notices[0].organization, "横浜市");
        assert_eq!(notices[0].deadline, "2026-02-01");
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let xml = r#"<Results><SearchResult>
            <ProjectName>案件</ProjectName>
            <ExternalDocumentURI>https://example.lg.jp/2</ExternalDocumentURI>
        </SearchResult></Results>"#;
        let notices = parse_response(xml).unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].organization, "");
        assert_eq!(notices[0].issue_date, "");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_response("not xml <<<").is_err());
    }
}
