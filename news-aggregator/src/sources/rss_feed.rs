use crate::traits::FeedClient;
use crate::types::{FeedSource, FetchConfig, NewsItem, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Reads RSS/Atom documents straight from the feed URL.
pub struct RssFeedClient {
    fetcher: Fetcher,
}

impl RssFeedClient {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
        })
    }
}

#[async_trait]
impl FeedClient for RssFeedClient {
    fn client_name(&self) -> &'static str {
        "rss"
    }

    async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        let body = self.fetcher.fetch_text(&source.url).await?;
        let parsed = FeedParser::parse_feed_document(body.as_bytes())?;

        info!(
            "Pulled {} items from {} ({})",
            parsed.items.len(),
            source.name,
            parsed.title.as_deref().unwrap_or("untitled feed")
        );
        Ok(parsed.items)
    }
}
