pub mod types;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod traits;
pub mod sources;
pub mod aggregator;
pub mod filter;
pub mod view;
pub mod utils;

pub use types::*;
pub use config::PulseConfig;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use traits::FeedClient;
pub use sources::{ProxyFeedClient, RssFeedClient};
pub use aggregator::Aggregator;
pub use filter::FilterEngine;
pub use view::{DisplayRecord, NewsView, NewsViewModel, Surface, ViewStatus};
