use std::fmt;

/// Header row of the ledger file.
pub const LEDGER_HEADER: [&str; 4] = ["cttee_id", "cttee_name", "campaign_id", "interest_id"];

/// One provisioned committee: its campaign and interest on the mailing list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    pub committee_id: i64,
    pub committee_name: String,
    pub campaign_id: String,
    pub interest_id: String,
}

impl MappingRecord {
    pub fn new(
        committee_id: i64,
        committee_name: impl Into<String>,
        campaign_id: impl Into<String>,
        interest_id: impl Into<String>,
    ) -> Self {
        Self {
            committee_id,
            committee_name: committee_name.into(),
            campaign_id: campaign_id.into(),
            interest_id: interest_id.into(),
        }
    }

    /// Fields in ledger column order.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.committee_id.to_string(),
            self.committee_name.clone(),
            self.campaign_id.clone(),
            self.interest_id.clone(),
        ]
    }
}

/// A uniquely-constrained ledger column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerColumn {
    CommitteeId,
    CampaignId,
    InterestId,
}

impl fmt::Display for LedgerColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedgerColumn::CommitteeId => LEDGER_HEADER[0],
            LedgerColumn::CampaignId => LEDGER_HEADER[2],
            LedgerColumn::InterestId => LEDGER_HEADER[3],
        };
        f.write_str(name)
    }
}

/// A value that already appears in its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub column: LedgerColumn,
    pub value: String,
    /// The record already holding the value
    pub existing: MappingRecord,
}
