//! Pure committees REST API client.
//!
//! Issues single page requests against the `Committees` collection. Paging
//! through the whole collection is left to the caller, which knows when to
//! stop.
//!
//! # Example
//!
//! ```rust,ignore
//! use committees_client::CommitteesClient;
//!
//! let client = CommitteesClient::new("https://committees-api.parliament.uk/api/", timeout)?;
//! let page = client.get_committees_page(0, 30).await?;
//! println!("{} committees upstream", page.total_results);
//! ```

pub mod error;
pub mod types;

pub use error::{CommitteesError, Result};
pub use types::{CommitteeItem, CommitteesPage};

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://committees-api.parliament.uk/api/";

/// Path of the committees collection, relative to the API base URL.
pub const COMMITTEES_PATH: &str = "Committees";

#[derive(Debug, Clone)]
pub struct CommitteesClient {
    client: reqwest::Client,
    base_url: String,
}

impl CommitteesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL of the committees collection (without paging parameters).
    pub fn committees_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), COMMITTEES_PATH)
    }

    /// Fetch one page of committees shown on the website.
    pub async fn get_committees_page(&self, skip: u64, take: u64) -> Result<CommitteesPage> {
        let url = self.committees_url();
        tracing::debug!(%url, skip, take, "Fetching committees page");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("ShowOnWebsiteOnly", "true".to_string()),
                ("Take", take.to_string()),
                ("Skip", skip.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CommitteesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}
