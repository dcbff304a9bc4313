use crate::types::{FeedSourceConfig, Result};
use async_trait::async_trait;

/// Retrieves raw syndication content for one configured source.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    /// Fetch the feed body. Implementations report every failure as an error;
    /// the aggregator turns errors into warnings and an empty contribution.
    async fn fetch_feed(&self, source: &FeedSourceConfig) -> Result<String>;
}

/// Supplies the configured feed sources of a channel.
#[async_trait]
pub trait SourceConfigProvider: Send + Sync {
    /// Active sources of the channel, in provider order.
    async fn load_sources(&self, channel: &str) -> Result<Vec<FeedSourceConfig>>;
}
