pub mod proxy_feed;
pub mod rss_feed;

pub use proxy_feed::{ProxyFeedClient, DEFAULT_PROXY_URL};
pub use rss_feed::RssFeedClient;
