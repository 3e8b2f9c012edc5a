use serde::Deserialize;

/// One `Skip`/`Take` page of the `Committees` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitteesPage {
    #[serde(rename = "totalResults")]
    pub total_results: u64,
    #[serde(default)]
    pub items: Vec<CommitteeItem>,
}

/// A committee as returned by the API. Fields this crate does not model are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitteeItem {
    pub id: i64,
    pub name: String,
    /// Chamber the committee belongs to ("Commons", "Lords", "Joint").
    #[serde(default)]
    pub house: Option<String>,
}
