//! Sync dependencies (using traits for testability)
//!
//! Builds the API clients and the mailing-list adapter from [`Config`] once,
//! so every component receives its collaborators through its constructor.

use anyhow::{Context, Result};
use async_trait::async_trait;
use committees_client::CommitteesClient;
use mailchimp_client::{CampaignSettings, CreateCampaignRequest, MailchimpClient};
use std::sync::Arc;

use crate::config::{CampaignDefaults, Config};
use crate::domains::mapping::MappingLedger;
use crate::kernel::{BaseMailingList, RemoteError};

// =============================================================================
// MailchimpClient Adapter (implements BaseMailingList trait)
// =============================================================================

/// Wrapper around MailchimpClient bound to one audience and interest category
pub struct MailchimpMailingList {
    client: MailchimpClient,
    audience_id: String,
    interest_category_id: String,
    defaults: CampaignDefaults,
}

impl MailchimpMailingList {
    pub fn new(
        client: MailchimpClient,
        audience_id: impl Into<String>,
        interest_category_id: impl Into<String>,
        defaults: CampaignDefaults,
    ) -> Self {
        Self {
            client,
            audience_id: audience_id.into(),
            interest_category_id: interest_category_id.into(),
            defaults,
        }
    }
}

#[async_trait]
impl BaseMailingList for MailchimpMailingList {
    async fn create_interest(&self, name: &str) -> Result<String, RemoteError> {
        let created = self
            .client
            .create_interest(&self.audience_id, &self.interest_category_id, name)
            .await?;
        Ok(created.id)
    }

    async fn create_campaign(&self, interest_id: &str, title: &str) -> Result<String, RemoteError> {
        let request = CreateCampaignRequest::for_interest(
            &self.audience_id,
            &self.interest_category_id,
            interest_id,
            CampaignSettings {
                title: title.to_string(),
                subject_line: self.defaults.subject_line.clone(),
                from_name: self.defaults.from_name.clone(),
                reply_to: self.defaults.reply_to.clone(),
            },
        );
        let created = self.client.create_campaign(&request).await?;
        Ok(created.id)
    }

    async fn set_campaign_content(
        &self,
        campaign_id: &str,
        html: &str,
    ) -> Result<(), RemoteError> {
        Ok(self.client.set_campaign_content(campaign_id, html).await?)
    }

    async fn send_campaign(&self, campaign_id: &str) -> Result<(), RemoteError> {
        Ok(self.client.send_campaign(campaign_id).await?)
    }
}

// =============================================================================
// SyncDeps
// =============================================================================

/// Everything a sync command needs, built from configuration.
#[derive(Clone)]
pub struct SyncDeps {
    pub committees: CommitteesClient,
    pub mailchimp: MailchimpClient,
    pub mailing_list: Arc<dyn BaseMailingList>,
    pub ledger: MappingLedger,
}

impl SyncDeps {
    pub fn from_config(config: &Config) -> Result<Self> {
        let committees =
            CommitteesClient::new(config.committees_api_base_url.clone(), config.http_timeout)
                .context("Failed to create committees API client")?;
        let mailchimp = MailchimpClient::new(
            config.mailchimp_api_key.clone(),
            &config.mailchimp_data_centre,
            config.http_timeout,
        )
        .context("Failed to create Mailchimp client")?;

        let mailing_list: Arc<dyn BaseMailingList> = Arc::new(MailchimpMailingList::new(
            mailchimp.clone(),
            config.audience_id.clone(),
            config.interest_category_id.clone(),
            config.campaign_defaults.clone(),
        ));

        Ok(Self {
            committees,
            mailchimp,
            mailing_list,
            ledger: MappingLedger::new(config.ledger_path.clone()),
        })
    }
}
