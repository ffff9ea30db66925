use crate::traits::FeedClient;
use crate::types::{FeedSource, FetchConfig, NewsItem, Result};
use crate::utils::url::proxied_feed_url;
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::{debug, info};

pub const DEFAULT_PROXY_URL: &str = "https://api.rss2json.com/v1/api.json";

/// Reads feeds through a format-conversion endpoint that answers with JSON
/// (`{"status": "ok", "items": [...]}`) instead of raw XML.
pub struct ProxyFeedClient {
    fetcher: Fetcher,
    proxy_url: String,
}

impl ProxyFeedClient {
    pub fn new(proxy_url: &str, fetch_config: FetchConfig) -> Result<Self> {
        // Fail on a bad endpoint now rather than once per source.
        proxied_feed_url(proxy_url, "https://example.com/feed.xml")?;

        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            proxy_url: proxy_url.to_string(),
        })
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }
}

#[async_trait]
impl FeedClient for ProxyFeedClient {
    fn client_name(&self) -> &'static str {
        "proxy"
    }

    async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        let url = proxied_feed_url(&self.proxy_url, &source.url)?;
        debug!("Requesting {} via {}", source.name, url);

        let body = self.fetcher.fetch_text(url.as_str()).await?;
        let parsed = FeedParser::parse_proxy_payload(&body)?;

        info!("Pulled {} items from {}", parsed.items.len(), source.name);
        Ok(parsed.items)
    }
}
