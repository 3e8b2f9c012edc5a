// TestDependencies - mock implementations for testing
//
// Provides in-memory stand-ins for the upstream collections and the
// mailing-list platform, recording every call for assertions.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::common::{FetchError, Page, PageSource};
use crate::kernel::{BaseMailingList, RemoteError};

// =============================================================================
// Mock Page Source
// =============================================================================

/// Serves a fixed item list page by page, like an offset-paginated API.
pub struct MockPageSource<T> {
    resource: String,
    items: Vec<T>,
    report_total: bool,
    stall_after: Option<usize>,
    fail_on: Option<usize>,
    calls: Mutex<Vec<(u64, u64)>>,
}

impl<T> MockPageSource<T> {
    pub fn new(resource: &str, items: Vec<T>) -> Self {
        Self {
            resource: resource.to_string(),
            items,
            report_total: true,
            stall_after: None,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Do not report a total (Mailchimp collections may omit `total_items`)
    pub fn without_total(mut self) -> Self {
        self.report_total = false;
        self
    }

    /// Serve empty pages from the `n`th request (0-based) onwards
    pub fn stall_after_requests(mut self, n: usize) -> Self {
        self.stall_after = Some(n);
        self
    }

    /// Fail the `n`th request (0-based)
    pub fn fail_on_request(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// (offset, limit) of every request made, in order
    pub fn calls(&self) -> Vec<(u64, u64)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl<T> PageSource for MockPageSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn resource_path(&self) -> String {
        self.resource.clone()
    }

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<T>, FetchError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((offset, limit));
            calls.len() - 1
        };

        if self.fail_on == Some(index) {
            return Err(FetchError::new(
                self.resource.clone(),
                offset,
                "mock upstream unavailable",
            ));
        }

        let total = self.report_total.then_some(self.items.len() as u64);

        if self.stall_after.is_some_and(|n| index >= n) {
            return Ok(Page {
                items: Vec::new(),
                total,
            });
        }

        let start = (offset as usize).min(self.items.len());
        let end = start.saturating_add(limit as usize).min(self.items.len());

        Ok(Page {
            items: self.items[start..end].to_vec(),
            total,
        })
    }
}

// =============================================================================
// Mock Mailing List
// =============================================================================

/// A campaign created through the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCampaign {
    pub id: String,
    pub interest_id: String,
    pub title: String,
}

/// Hands out sequential ids (`I1`, `I2`, ... and `C1`, `C2`, ...).
#[derive(Default)]
pub struct MockMailingList {
    interests: Mutex<Vec<String>>,
    campaigns: Mutex<Vec<CreatedCampaign>>,
    contents: Mutex<Vec<(String, String)>>,
    sent: Mutex<Vec<String>>,
    fail_interest: bool,
    fail_campaign: bool,
    fail_send: bool,
}

impl MockMailingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_interest(mut self) -> Self {
        self.fail_interest = true;
        self
    }

    pub fn failing_campaign(mut self) -> Self {
        self.fail_campaign = true;
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Names of every interest created
    pub fn interests(&self) -> Vec<String> {
        self.interests.lock().unwrap().clone()
    }

    pub fn campaigns(&self) -> Vec<CreatedCampaign> {
        self.campaigns.lock().unwrap().clone()
    }

    /// (campaign_id, html) for every content upload
    pub fn contents(&self) -> Vec<(String, String)> {
        self.contents.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseMailingList for MockMailingList {
    async fn create_interest(&self, name: &str) -> Result<String, RemoteError> {
        if self.fail_interest {
            return Err("mock: interest rejected (400)".into());
        }
        let mut interests = self.interests.lock().unwrap();
        interests.push(name.to_string());
        Ok(format!("I{}", interests.len()))
    }

    async fn create_campaign(&self, interest_id: &str, title: &str) -> Result<String, RemoteError> {
        if self.fail_campaign {
            return Err("mock: campaign rejected (400)".into());
        }
        let mut campaigns = self.campaigns.lock().unwrap();
        let id = format!("C{}", campaigns.len() + 1);
        campaigns.push(CreatedCampaign {
            id: id.clone(),
            interest_id: interest_id.to_string(),
            title: title.to_string(),
        });
        Ok(id)
    }

    async fn set_campaign_content(
        &self,
        campaign_id: &str,
        html: &str,
    ) -> Result<(), RemoteError> {
        self.contents
            .lock()
            .unwrap()
            .push((campaign_id.to_string(), html.to_string()));
        Ok(())
    }

    async fn send_campaign(&self, campaign_id: &str) -> Result<(), RemoteError> {
        if self.fail_send {
            return Err("mock: campaign not ready to send".into());
        }
        self.sent.lock().unwrap().push(campaign_id.to_string());
        Ok(())
    }
}
