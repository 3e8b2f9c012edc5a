//! Provision one committee: interest, then campaign, then ledger row.
//!
//! The two remote writes and the local append cannot share a transaction, so
//! the order is fixed and anything that fails once the interest exists is
//! reported as [`ProvisionError::Inconsistent`] with the orphaned remote ids.
//! Nothing is retried and nothing is rolled back.

use std::sync::Arc;
use thiserror::Error;

use crate::common::BoxError;
use crate::domains::committees::CommitteeDirectory;
use crate::domains::mapping::{LedgerColumn, LedgerError, MappingLedger, MappingRecord};
use crate::kernel::{BaseMailingList, RemoteError};

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Not in the directory for the target jurisdiction
    #[error("committee {committee_id} not found in committee directory")]
    UnknownCommittee { committee_id: i64 },

    /// Already provisioned; the expected outcome of a re-run
    #[error("committee {committee_id} is already mapped ({column} '{value}' exists in ledger)")]
    AlreadyMapped {
        committee_id: i64,
        column: LedgerColumn,
        value: String,
    },

    /// The ledger could not be read before anything was created
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Rejected by the mailing-list platform before anything was created
    #[error("failed to create {resource} for committee {committee_id}: {source}")]
    RemoteCreation {
        committee_id: i64,
        resource: &'static str,
        #[source]
        source: RemoteError,
    },

    /// Remote objects exist without a ledger row. Needs manual reconciliation.
    #[error(
        "INCONSISTENT: committee {committee_id} has interest '{interest_id}' and campaign '{}' on the mailing list but no ledger row; clean up manually ({cause})",
        .campaign_id.as_deref().unwrap_or("<not created>")
    )]
    Inconsistent {
        committee_id: i64,
        interest_id: String,
        campaign_id: Option<String>,
        #[source]
        cause: BoxError,
    },
}

impl ProvisionError {
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, ProvisionError::Inconsistent { .. })
    }
}

pub struct Provisioner {
    directory: CommitteeDirectory,
    ledger: MappingLedger,
    mailing_list: Arc<dyn BaseMailingList>,
}

impl Provisioner {
    pub fn new(
        directory: CommitteeDirectory,
        ledger: MappingLedger,
        mailing_list: Arc<dyn BaseMailingList>,
    ) -> Self {
        Self {
            directory,
            ledger,
            mailing_list,
        }
    }

    /// Create the interest and campaign for `committee_id` and record them.
    ///
    /// A committee already in the ledger, or a ledger that cannot be opened
    /// for writing, is rejected before any remote call.
    pub async fn provision(&self, committee_id: i64) -> Result<MappingRecord, ProvisionError> {
        let committee = self
            .directory
            .get(committee_id)
            .ok_or(ProvisionError::UnknownCommittee { committee_id })?;

        if let Some(collision) = self.ledger.find_duplicate(committee_id, "", "")? {
            tracing::warn!(
                committee_id,
                campaign_id = %collision.existing.campaign_id,
                interest_id = %collision.existing.interest_id,
                "Committee already mapped, nothing to do"
            );
            return Err(ProvisionError::AlreadyMapped {
                committee_id,
                column: collision.column,
                value: collision.value,
            });
        }

        self.ledger.check_writable()?;

        let interest_id = self
            .mailing_list
            .create_interest(&committee.name)
            .await
            .map_err(|source| ProvisionError::RemoteCreation {
                committee_id,
                resource: "interest",
                source,
            })?;
        tracing::info!(committee_id, %interest_id, name = %committee.name, "Created interest");

        let campaign_id = match self
            .mailing_list
            .create_campaign(&interest_id, &committee.name)
            .await
        {
            Ok(id) => id,
            Err(cause) => return Err(inconsistent(committee_id, interest_id, None, cause)),
        };
        tracing::info!(committee_id, %campaign_id, %interest_id, "Created campaign");

        let record = MappingRecord::new(
            committee_id,
            committee.name.clone(),
            campaign_id,
            interest_id,
        );

        // Re-checks for duplicates: a concurrent run may have committed since the first check.
        if let Err(e) = self.ledger.append(&record) {
            return Err(inconsistent(
                committee_id,
                record.interest_id,
                Some(record.campaign_id),
                Box::new(e),
            ));
        }

        Ok(record)
    }
}

fn inconsistent(
    committee_id: i64,
    interest_id: String,
    campaign_id: Option<String>,
    cause: BoxError,
) -> ProvisionError {
    tracing::error!(
        committee_id,
        %interest_id,
        campaign_id = campaign_id.as_deref().unwrap_or("<not created>"),
        error = %cause,
        "Remote objects created without a ledger row; manual cleanup required"
    );
    ProvisionError::Inconsistent {
        committee_id,
        interest_id,
        campaign_id,
        cause,
    }
}
