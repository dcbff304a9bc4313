use crate::traits::FetchFeed;
use crate::types::{AggregatorError, FeedSourceConfig, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP fetcher for syndication feeds.
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

    /// Fetch one source, never failing: any error is logged as a warning and
    /// yields `None`.
    pub async fn fetch_content(&self, source: &FeedSourceConfig) -> Option<String> {
        fetch_or_warn(self, source, Duration::from_secs(self.config.timeout_seconds)).await
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::HttpStatus {
                status: status.as_u16(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(AggregatorError::FeedTooLarge { size_mb });
            }
        }

        let content = response.text().await?;
        info!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}

#[async_trait]
impl FetchFeed for Fetcher {
    async fn fetch_feed(&self, source: &FeedSourceConfig) -> Result<String> {
        self.fetch_body(&source.feed_url).await
    }
}

/// Run `fetcher` for one source under `timeout`, converting every failure into
/// one warning line and an empty contribution.
pub async fn fetch_or_warn(
    fetcher: &dyn FetchFeed,
    source: &FeedSourceConfig,
    timeout: Duration,
) -> Option<String> {
    let outcome = match tokio::time::timeout(timeout, fetcher.fetch_feed(source)).await {
        Ok(result) => result,
        Err(_) => Err(AggregatorError::Timeout {
            seconds: timeout.as_secs(),
        }),
    };

    match outcome {
        Ok(content) => Some(content),
        Err(e) => {
            warn!(
                source = %source.source_name,
                url = %source.feed_url,
                kind = e.kind(),
                "Feed source unavailable: {}",
                e
            );
            None
        }
    }
}
