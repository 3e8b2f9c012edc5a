//! Sending an update through a committee's campaign.
//!
//! The HTML body is built elsewhere; this only uploads it and triggers the send.

use thiserror::Error;

use crate::domains::mapping::{LedgerError, MappingLedger};
use crate::kernel::{BaseMailingList, RemoteError};

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("committee {committee_id} has no campaign in the mapping ledger")]
    NotMapped { committee_id: i64 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("failed to set content of campaign {campaign_id}: {source}")]
    Content {
        campaign_id: String,
        #[source]
        source: RemoteError,
    },

    #[error("failed to send campaign {campaign_id}: {source}")]
    Send {
        campaign_id: String,
        #[source]
        source: RemoteError,
    },
}

/// Campaign id recorded for a committee.
pub fn campaign_for_committee(
    ledger: &MappingLedger,
    committee_id: i64,
) -> Result<String, CampaignError> {
    ledger
        .find_by_committee(committee_id)?
        .map(|record| record.campaign_id)
        .ok_or(CampaignError::NotMapped { committee_id })
}

/// Replace the campaign body with `html`, then send it.
pub async fn send_update(
    mailing_list: &dyn BaseMailingList,
    campaign_id: &str,
    html: &str,
) -> Result<(), CampaignError> {
    mailing_list
        .set_campaign_content(campaign_id, html)
        .await
        .map_err(|source| CampaignError::Content {
            campaign_id: campaign_id.to_string(),
            source,
        })?;
    tracing::info!(campaign_id, bytes = html.len(), "Uploaded campaign content");

    mailing_list
        .send_campaign(campaign_id)
        .await
        .map_err(|source| CampaignError::Send {
            campaign_id: campaign_id.to_string(),
            source,
        })?;
    tracing::info!(campaign_id, "Campaign sent");

    Ok(())
}
