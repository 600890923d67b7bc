/// One tender notice from the portal's `SearchResult` XML elements.
/// All fields come back as element text; absent elements map to empty
/// strings, matching the portal's own sparse responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcurementNotice {
    pub project_name: String,
    pub document_url: String,
    pub organization: String,
    pub prefecture: String,
    pub category: String,
    pub issue_date: String,
    pub deadline: String,
}
