use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Defaults applied to every campaign created for a committee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDefaults {
    pub subject_line: String,
    pub from_name: String,
    pub reply_to: String,
}

impl Default for CampaignDefaults {
    fn default() -> Self {
        Self {
            subject_line: "Automated Committee Update".to_string(),
            from_name: "Automated Reports".to_string(),
            reply_to: "committeecorridor@parliament.uk".to_string(),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub mailchimp_api_key: String,
    pub mailchimp_data_centre: String,
    pub audience_id: String,
    /// Interest category ("group") that committee interests are created in
    pub interest_category_id: String,
    pub committees_api_base_url: String,
    /// Only committees whose house equals this value are provisioned
    pub target_jurisdiction: String,
    pub ledger_path: PathBuf,
    pub campaign_defaults: CampaignDefaults,
    pub committees_page_size: u64,
    pub mailchimp_page_size: u64,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = CampaignDefaults::default();

        Ok(Self {
            mailchimp_api_key: env::var("MAILCHIMP_API_KEY")
                .context("MAILCHIMP_API_KEY must be set")?,
            mailchimp_data_centre: env::var("MAILCHIMP_DATA_CENTRE")
                .context("MAILCHIMP_DATA_CENTRE must be set")?,
            audience_id: env::var("MAILCHIMP_AUDIENCE_ID")
                .context("MAILCHIMP_AUDIENCE_ID must be set")?,
            interest_category_id: env::var("MAILCHIMP_INTEREST_CATEGORY_ID")
                .context("MAILCHIMP_INTEREST_CATEGORY_ID must be set")?,
            committees_api_base_url: env::var("COMMITTEES_API_BASE_URL")
                .unwrap_or_else(|_| committees_client::DEFAULT_BASE_URL.to_string()),
            target_jurisdiction: env::var("TARGET_JURISDICTION")
                .unwrap_or_else(|_| "Commons".to_string()),
            ledger_path: env::var("MAPPING_LEDGER_PATH")
                .unwrap_or_else(|_| "mapping.csv".to_string())
                .into(),
            campaign_defaults: CampaignDefaults {
                subject_line: env::var("CAMPAIGN_SUBJECT").unwrap_or(defaults.subject_line),
                from_name: env::var("CAMPAIGN_FROM_NAME").unwrap_or(defaults.from_name),
                reply_to: env::var("CAMPAIGN_REPLY_TO").unwrap_or(defaults.reply_to),
            },
            committees_page_size: parse_var("COMMITTEES_PAGE_SIZE", 30)?,
            mailchimp_page_size: parse_var("MAILCHIMP_PAGE_SIZE", 1000)?,
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
