use committees_client::CommitteeItem;

/// Snapshot of an upstream committee, held for the lifetime of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committee {
    pub id: i64,
    pub name: String,
    /// The chamber the committee belongs to ("Commons", "Lords", "Joint")
    pub jurisdiction: String,
}

impl Committee {
    pub fn new(id: i64, name: impl Into<String>, jurisdiction: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            jurisdiction: jurisdiction.into(),
        }
    }
}

impl From<CommitteeItem> for Committee {
    fn from(item: CommitteeItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            jurisdiction: item.house.unwrap_or_default(),
        }
    }
}
