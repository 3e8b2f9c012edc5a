//! [`PageSource`] adapters over the two API clients.

use async_trait::async_trait;
use committees_client::{CommitteeItem, CommitteesClient};
use mailchimp_client::{Collection, MailchimpClient};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use crate::common::{FetchError, Page, PageSource};

/// The committees collection (`Skip`/`Take`, `totalResults`).
#[derive(Debug, Clone)]
pub struct CommitteesSource {
    client: CommitteesClient,
}

impl CommitteesSource {
    pub fn new(client: CommitteesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for CommitteesSource {
    type Item = CommitteeItem;

    fn resource_path(&self) -> String {
        self.client.committees_url()
    }

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<CommitteeItem>, FetchError> {
        let page = self
            .client
            .get_committees_page(offset, limit)
            .await
            .map_err(|e| FetchError::new(self.resource_path(), offset, e))?;

        Ok(Page {
            items: page.items,
            total: Some(page.total_results),
        })
    }
}

/// A Mailchimp collection (`count`/`offset`, optional `total_items`).
#[derive(Debug, Clone)]
pub struct MailchimpSource<T> {
    client: MailchimpClient,
    collection: Collection,
    _item: PhantomData<fn() -> T>,
}

impl<T> MailchimpSource<T> {
    pub fn new(client: MailchimpClient, collection: Collection) -> Self {
        Self {
            client,
            collection,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PageSource for MailchimpSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    fn resource_path(&self) -> String {
        self.collection.path()
    }

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<T>, FetchError> {
        let page = self
            .client
            .get_collection_page::<T>(&self.collection, limit, offset)
            .await
            .map_err(|e| FetchError::new(self.resource_path(), offset, e))?;

        Ok(Page {
            items: page.items,
            total: page.total_items,
        })
    }
}
