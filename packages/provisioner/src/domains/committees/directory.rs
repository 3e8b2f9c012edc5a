//! In-memory directory of the committees in one jurisdiction.

use committees_client::CommitteeItem;
use std::collections::BTreeMap;
use thiserror::Error;

use super::Committee;
use crate::common::{fetch_all_filtered, FetchError, PageSource};

/// The committees collection could not be read; no partial directory exists.
#[derive(Debug, Error)]
#[error("failed to build committee directory: {0}")]
pub struct DirectoryFetchError(#[from] pub FetchError);

/// Committees keyed by their upstream id.
#[derive(Debug, Clone, Default)]
pub struct CommitteeDirectory {
    committees: BTreeMap<i64, Committee>,
}

impl CommitteeDirectory {
    /// Page through the whole committees collection, keeping only committees
    /// whose jurisdiction equals `jurisdiction`.
    pub async fn build<S>(
        source: &S,
        jurisdiction: &str,
        page_size: u64,
    ) -> Result<Self, DirectoryFetchError>
    where
        S: PageSource<Item = CommitteeItem> + ?Sized,
    {
        let items = fetch_all_filtered(source, page_size, |item| {
            item.house.as_deref() == Some(jurisdiction)
        })
        .await?;

        let directory: Self = items.into_iter().map(Committee::from).collect();

        tracing::info!(
            resource = %source.resource_path(),
            jurisdiction,
            count = directory.len(),
            "Built committee directory"
        );

        Ok(directory)
    }

    pub fn get(&self, id: i64) -> Option<&Committee> {
        self.committees.get(&id)
    }

    pub fn len(&self) -> usize {
        self.committees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committees.is_empty()
    }

    /// Committees in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Committee> {
        self.committees.values()
    }
}

impl FromIterator<Committee> for CommitteeDirectory {
    fn from_iter<I: IntoIterator<Item = Committee>>(iter: I) -> Self {
        Self {
            committees: iter.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}
