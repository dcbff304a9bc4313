use crate::traits::SourceConfigProvider;
use crate::types::{AggregatorError, FeedSourceConfig, Result};
use crate::utils::url::is_valid_feed_url;
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<FeedSourceConfig>,
}

/// In-process source configuration provider backed by a list of records,
/// usually loaded from a TOML file of `[[sources]]` tables.
#[derive(Debug, Clone, Default)]
pub struct FeedManager {
    sources: Vec<FeedSourceConfig>,
}

impl FeedManager {
    pub fn new(sources: Vec<FeedSourceConfig>) -> Result<Self> {
        for source in &sources {
            validate_source(source)?;
        }
        Ok(Self { sources })
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let manager = Self::from_toml_str(&content)?;
        info!(
            "Loaded {} feed source records from {}",
            manager.sources.len(),
            path.display()
        );
        Ok(manager)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: SourcesFile = toml::from_str(content)?;
        Self::new(file.sources)
    }

    /// Active sources of `channel`, highest base priority first. Records with
    /// equal priority keep file order.
    pub fn active_sources(&self, channel: &str) -> Vec<FeedSourceConfig> {
        let mut configs: Vec<FeedSourceConfig> = self
            .sources
            .iter()
            .filter(|s| s.channel == channel && s.is_active)
            .cloned()
            .collect();
        configs.sort_by(|a, b| b.priority.cmp(&a.priority));
        configs
    }

    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.sources.iter().map(|s| s.channel.clone()).collect();
        channels.sort();
        channels.dedup();
        channels
    }
}

#[async_trait]
impl SourceConfigProvider for FeedManager {
    async fn load_sources(&self, channel: &str) -> Result<Vec<FeedSourceConfig>> {
        let configs = self.active_sources(channel);
        if configs.is_empty() {
            debug!("No active feed sources for channel '{}'", channel);
            return Ok(configs);
        }

        let mut source_names: Vec<&str> = Vec::new();
        for config in &configs {
            if !source_names.contains(&config.source_name.as_str()) {
                source_names.push(&config.source_name);
            }
        }
        info!(
            "Channel '{}': {} feed configurations from sources {}",
            channel,
            configs.len(),
            source_names.join(", ")
        );

        Ok(configs)
    }
}

fn validate_source(source: &FeedSourceConfig) -> Result<()> {
    let invalid = |reason: &str| AggregatorError::InvalidSource {
        name: source.source_name.clone(),
        reason: reason.to_string(),
    };

    if source.source_name.trim().is_empty() {
        return Err(invalid("empty source name"));
    }
    if source.channel.trim().is_empty() {
        return Err(invalid("empty channel"));
    }
    if !is_valid_feed_url(&source.feed_url) {
        return Err(invalid("feed_url must be an http(s) URL"));
    }
    if !source.weight.is_finite() || source.weight < 0.0 {
        return Err(invalid("weight must be a finite, non-negative number"));
    }
    Ok(())
}
