use crate::types::{AggregatorError, FetchConfig, Result};
use backoff::{backoff::Backoff, ExponentialBackoffBuilder};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// HTTP transport shared by the feed clients.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url` and return the body. Transport errors and 5xx responses are
    /// retried with exponential backoff; other non-success statuses fail at once.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching {}", url);

        let retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let mut backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(retry_delay)
            .with_multiplier(2.0)
            .with_max_interval(retry_delay * 8)
            .with_max_elapsed_time(None)
            .build();

        let mut attempt = 0;
        loop {
            let error = match self.client.get(url).send().await {
                Ok(response) => match self.read_body(url, response).await {
                    Ok(body) => {
                        debug!(
                            "Fetched {} ({} bytes in {}ms)",
                            url,
                            body.len(),
                            start_time.elapsed().as_millis()
                        );
                        return Ok(body);
                    }
                    Err(e) => e,
                },
                Err(e) => AggregatorError::Http(e),
            };

            if attempt >= self.config.max_retries || !is_retryable(&error) {
                return Err(error);
            }

            match backoff.next_backoff() {
                Some(delay) => {
                    warn!("Attempt {} failed for {}: {}, retrying in {:?}", attempt + 1, url, error, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(error),
            }
        }
    }

    async fn read_body(&self, url: &str, mut response: Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let limit_mb = self.config.max_feed_size_mb;
        let limit = limit_mb as u64 * 1024 * 1024;

        // Declared length is only a hint: it is absent for chunked bodies and
        // dropped by reqwest when it decompresses.
        if let Some(content_length) = response.content_length() {
            if content_length > limit {
                return Err(AggregatorError::FeedTooLarge { bytes: content_length, limit_mb });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > limit {
                return Err(AggregatorError::FeedTooLarge {
                    bytes: body.len() as u64,
                    limit_mb,
                });
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn is_retryable(error: &AggregatorError) -> bool {
    match error {
        AggregatorError::Http(_) => true,
        AggregatorError::Status { status, .. } => *status >= 500 || *status == 429,
        _ => false,
    }
}
