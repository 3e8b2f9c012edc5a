//! Offset-cursor pagination over upstream collections.
//!
//! Both upstreams page the same way: an offset (`Skip` / `offset`), a page
//! size (`Take` / `count`) and, usually, a reported total. [`fetch_all`] walks
//! a [`PageSource`] until one of these holds:
//!
//! - the number of items received reaches the reported total
//! - a page comes back shorter than requested
//! - a page comes back empty (a stalled cursor; logged as a warning)
//!
//! Failed requests are never retried here. The first error ends the walk.

use async_trait::async_trait;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Upstream unreachable, non-2xx, or returned a body we could not read.
#[derive(Debug, Error)]
#[error("failed to fetch {resource} at offset {offset}: {source}")]
pub struct FetchError {
    pub resource: String,
    pub offset: u64,
    #[source]
    pub source: BoxError,
}

impl FetchError {
    pub fn new(resource: impl Into<String>, offset: u64, source: impl Into<BoxError>) -> Self {
        Self {
            resource: resource.into(),
            offset,
            source: source.into(),
        }
    }
}

/// One page of a collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items upstream, if the API reports one.
    pub total: Option<u64>,
}

/// A collection that can be read one page at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Path or URL of the collection, used in logs and errors.
    fn resource_path(&self) -> String;

    /// Issue exactly one request for `limit` items starting at `offset`.
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<Self::Item>, FetchError>;
}

/// Fetch every item of a collection.
pub async fn fetch_all<S>(source: &S, page_size: u64) -> Result<Vec<S::Item>, FetchError>
where
    S: PageSource + ?Sized,
{
    fetch_all_filtered(source, page_size, |_| true).await
}

/// Fetch every item of a collection, keeping only those accepted by `keep`.
///
/// Rejected items still count towards the reported total and advance the
/// cursor; they are dropped as each page arrives.
pub async fn fetch_all_filtered<S, F>(
    source: &S,
    page_size: u64,
    mut keep: F,
) -> Result<Vec<S::Item>, FetchError>
where
    S: PageSource + ?Sized,
    F: FnMut(&S::Item) -> bool + Send,
{
    let page_size = page_size.max(1);
    let resource = source.resource_path();

    let mut kept = Vec::new();
    let mut received: u64 = 0;
    let mut reported_total: Option<u64> = None;
    let mut requests: u64 = 0;

    loop {
        tracing::debug!(%resource, offset = received, page_size, "Fetching page");
        let page = source.fetch_page(received, page_size).await?;
        requests += 1;

        if page.total.is_some() {
            reported_total = page.total;
        }

        let count = page.items.len() as u64;
        if count == 0 {
            match reported_total {
                Some(total) if received < total => tracing::warn!(
                    %resource,
                    offset = received,
                    total,
                    "Received empty page before reaching reported total, stopping early"
                ),
                _ => tracing::debug!(
                    %resource,
                    offset = received,
                    "Empty page, collection exhausted"
                ),
            }
            break;
        }

        received += count;
        kept.extend(page.items.into_iter().filter(|item| keep(item)));

        if reported_total.is_some_and(|total| received >= total) || count < page_size {
            break;
        }
    }

    tracing::debug!(
        %resource,
        requests,
        received,
        kept = kept.len(),
        ?reported_total,
        "Finished paginated fetch"
    );

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockPageSource;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn numbers(n: u64) -> Vec<u64> {
        (0..n).collect()
    }

    /// Formatted log output collected in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        /// Route events on this thread into the buffer until the guard drops.
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_issues_ceil_total_over_page_size_requests() {
        for (total, page_size) in [(1, 1), (10, 3), (30, 30), (31, 30), (95, 10), (7, 100)] {
            let source = MockPageSource::new("Committees", numbers(total));

            let items = fetch_all(&source, page_size).await.unwrap();

            assert_eq!(items, numbers(total), "total={total} page_size={page_size}");
            assert_eq!(
                source.call_count() as u64,
                total.div_ceil(page_size),
                "total={total} page_size={page_size}"
            );
        }
    }

    #[tokio::test]
    async fn test_offsets_advance_by_items_received() {
        let source = MockPageSource::new("Committees", numbers(7));

        fetch_all(&source, 3).await.unwrap();

        assert_eq!(source.calls(), vec![(0, 3), (3, 3), (6, 3)]);
    }

    #[tokio::test]
    async fn test_empty_page_before_total_terminates() {
        // Upstream claims 50 items but stops serving after the second page.
        let source = MockPageSource::new("Committees", numbers(50)).stall_after_requests(2);

        let items = fetch_all(&source, 10).await.unwrap();

        assert_eq!(items.len(), 20);
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_page_before_total_logs_warning() {
        let logs = LogBuffer::default();
        let _guard = logs.install();
        let source = MockPageSource::new("Committees", numbers(50)).stall_after_requests(2);

        fetch_all(&source, 10).await.unwrap();

        let output = logs.contents();
        let warning = output
            .lines()
            .find(|line| line.contains("stopping early"))
            .unwrap_or_else(|| panic!("no stall warning in:\n{output}"));
        assert!(warning.contains("WARN"));
        assert!(warning.contains("total=50"));
    }

    #[tokio::test]
    async fn test_empty_page_without_total_is_not_a_warning() {
        let logs = LogBuffer::default();
        let _guard = logs.install();
        let source = MockPageSource::new("/campaigns", numbers(20)).without_total();

        fetch_all(&source, 10).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("collection exhausted"));
        assert!(!output.contains("WARN"));
    }

    #[tokio::test]
    async fn test_short_page_ends_walk_without_total() {
        let source = MockPageSource::new("/campaigns", numbers(25)).without_total();

        let items = fetch_all(&source, 10).await.unwrap();

        assert_eq!(items.len(), 25);
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exact_multiple_without_total_needs_one_empty_page() {
        let source = MockPageSource::new("/campaigns", numbers(20)).without_total();

        let items = fetch_all(&source, 10).await.unwrap();

        assert_eq!(items.len(), 20);
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn test_filter_applies_per_item_but_cursor_counts_all() {
        let source = MockPageSource::new("Committees", numbers(10));

        let evens = fetch_all_filtered(&source, 4, |n| n % 2 == 0).await.unwrap();

        assert_eq!(evens, vec![0, 2, 4, 6, 8]);
        assert_eq!(source.calls(), vec![(0, 4), (4, 4), (8, 4)]);
    }

    #[tokio::test]
    async fn test_error_is_not_retried() {
        let source = MockPageSource::new("Committees", numbers(30)).fail_on_request(1);

        let err = fetch_all(&source, 10).await.unwrap_err();

        assert_eq!(err.resource, "Committees");
        assert_eq!(err.offset, 10);
        assert_eq!(source.call_count(), 2);
    }
}
