//! Pure Mailchimp Marketing API (3.0) client.
//!
//! Covers the handful of endpoints needed to manage an audience from a script:
//! single-page reads of collections, interest and campaign creation, campaign
//! content upload and sending. Nothing here retries; every non-2xx response
//! is surfaced as [`MailchimpError::Api`].
//!
//! # Example
//!
//! ```rust,ignore
//! use mailchimp_client::{Collection, MailchimpClient, Segment};
//!
//! let client = MailchimpClient::new(api_key, "us21", timeout)?;
//! let page = client
//!     .get_collection_page::<Segment>(&Collection::Segments { list_id }, 1000, 0)
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{MailchimpError, Result};
pub use types::{
    Campaign, CampaignContent, CampaignSettings, Collection, CollectionPage,
    CreateCampaignRequest, CreateInterestRequest, Created, Interest, InterestCategory, Segment,
    Tag,
};

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Mailchimp ignores the basic-auth username; only the key matters.
const AUTH_USER: &str = "anystring";

#[derive(Debug, Clone)]
pub struct MailchimpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl MailchimpClient {
    pub fn new(api_key: impl Into<String>, data_centre: &str, timeout: Duration) -> Result<Self> {
        Self::with_base_url(
            api_key,
            format!("https://{}.api.mailchimp.com/3.0", data_centre),
            timeout,
        )
    }

    /// Point the client at an arbitrary base URL (mock servers, proxies).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Mailchimp request");
        self.client
            .request(method, url)
            .basic_auth(AUTH_USER, Some(&self.api_key))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailchimpError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let resp = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        Ok(resp.json().await?)
    }

    /// Fetch one page of a collection.
    pub async fn get_collection_page<T: DeserializeOwned>(
        &self,
        collection: &Collection,
        count: u64,
        offset: u64,
    ) -> Result<CollectionPage<T>> {
        let resp = self
            .execute(
                self.request(Method::GET, &collection.path())
                    .query(&[("count", count), ("offset", offset)]),
            )
            .await?;
        let body: serde_json::Value = resp.json().await?;
        parse_collection_page(body, collection.field())
    }

    /// Add an interest (option) inside an interest category (group).
    pub async fn create_interest(
        &self,
        list_id: &str,
        category_id: &str,
        name: &str,
    ) -> Result<Created> {
        let path = format!("/lists/{}/interest-categories/{}/interests", list_id, category_id);
        self.post_json(
            &path,
            &CreateInterestRequest {
                name: name.to_string(),
            },
        )
        .await
    }

    pub async fn create_campaign(&self, request: &CreateCampaignRequest) -> Result<Created> {
        self.post_json("/campaigns", request).await
    }

    /// Replace the campaign's content with the given HTML body.
    pub async fn set_campaign_content(&self, campaign_id: &str, html: &str) -> Result<()> {
        let path = format!("/campaigns/{}/content", campaign_id);
        let body = CampaignContent {
            html: html.to_string(),
        };
        self.execute(self.request(Method::PUT, &path).json(&body))
            .await?;
        Ok(())
    }

    pub async fn send_campaign(&self, campaign_id: &str) -> Result<()> {
        let path = format!("/campaigns/{}/actions/send", campaign_id);
        self.execute(self.request(Method::POST, &path)).await?;
        Ok(())
    }
}

/// Pull the items and `total_items` out of a collection response body.
///
/// A missing items field is read as an empty page.
pub fn parse_collection_page<T: DeserializeOwned>(
    mut body: serde_json::Value,
    field: &str,
) -> Result<CollectionPage<T>> {
    let total_items = body.get("total_items").and_then(|v| v.as_u64());
    let items = match body.get_mut(field).map(serde_json::Value::take) {
        Some(value) if !value.is_null() => serde_json::from_value(value)?,
        _ => Vec::new(),
    };
    Ok(CollectionPage { items, total_items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_collection_page_reads_named_field() {
        let body = json!({
            "segments": [
                {"id": 1, "name": "Health", "type": "saved"},
                {"id": 2, "name": "Finance", "type": "static"}
            ],
            "total_items": 2
        });

        let page: CollectionPage<Segment> = parse_collection_page(body, "segments").unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, Some(2));
        assert_eq!(page.items[1].segment_type.as_deref(), Some("static"));
    }

    #[test]
    fn test_parse_collection_page_missing_field_is_empty() {
        let page: CollectionPage<Tag> = parse_collection_page(json!({}), "tags").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, None);
    }

    #[test]
    fn test_parse_collection_page_rejects_wrong_shape() {
        let result: Result<CollectionPage<Tag>> =
            parse_collection_page(json!({"tags": "nope"}), "tags");
        assert!(matches!(result, Err(MailchimpError::Parse(_))));
    }

    #[test]
    fn test_base_url_from_data_centre() {
        let client = MailchimpClient::new("key-us21", "us21", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://us21.api.mailchimp.com/3.0");
    }
}
