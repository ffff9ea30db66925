use crate::types::{FeedSource, NewsItem, Result};
use async_trait::async_trait;

/// Fetches one feed source and normalizes its items.
///
/// Implementations report every failure (transport, status, malformed
/// payload) through the returned `Result`; the aggregator only cares whether
/// a source succeeded. The `source` field of returned items may be filled
/// with whatever the feed calls itself, the aggregator overwrites it.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Short name used in logs.
    fn client_name(&self) -> &'static str;

    async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>>;
}
