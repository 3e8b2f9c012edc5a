// Common test utilities

use provisioner_core::domains::committees::{Committee, CommitteeDirectory};
use provisioner_core::domains::mapping::MappingLedger;
use provisioner_core::domains::provisioning::Provisioner;
use provisioner_core::kernel::test_dependencies::MockMailingList;
use std::sync::Arc;
use tempfile::TempDir;

/// {101: "Health Committee", 202: "Finance Committee"}
pub fn commons_directory() -> CommitteeDirectory {
    [
        Committee::new(101, "Health Committee", "Commons"),
        Committee::new(202, "Finance Committee", "Commons"),
    ]
    .into_iter()
    .collect()
}

/// A provisioner over a fresh ledger file in its own temp directory.
pub struct Harness {
    pub provisioner: Provisioner,
    pub mailing_list: Arc<MockMailingList>,
    pub ledger: MappingLedger,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mailing_list(MockMailingList::new())
    }

    pub fn with_mailing_list(mailing_list: MockMailingList) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let ledger = MappingLedger::new(dir.path().join("mapping.csv"));
        let mailing_list = Arc::new(mailing_list);
        let provisioner =
            Provisioner::new(commons_directory(), ledger.clone(), mailing_list.clone());

        Self {
            provisioner,
            mailing_list,
            ledger,
            _dir: dir,
        }
    }

    pub fn ledger_contents(&self) -> String {
        std::fs::read_to_string(self.ledger.path()).unwrap_or_default()
    }
}
