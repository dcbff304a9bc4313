use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
// Boundary records shared with the configuration provider and the script stage
pub use interfaces::defs::{FeedSourceConfig, NewsItem};

pub const DEFAULT_MAX_ITEMS: usize = 20;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "News-Aggregator/1.0".to_string(),
            timeout_seconds: 10,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Limits applied while turning raw feed content into candidates.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    pub max_entries: usize,
    pub freshness_hours: i64,
    pub summary_max_chars: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_entries: 10,
            freshness_hours: 24,
            summary_max_chars: 200,
        }
    }
}

/// A feed entry that passed the freshness cutoff, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published: DateTime<Utc>,
}

impl ParsedEntry {
    /// Combined text the keyword stages look at.
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// Arguments of one aggregation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub channel: String,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Restrict to these source names. Empty means all.
    #[serde(default)]
    pub source_filter: Vec<String>,
    /// Restrict to these declared feed categories. Empty means all.
    #[serde(default)]
    pub category_filter: Vec<String>,
    #[serde(default)]
    pub min_priority: Option<u8>,
    /// Apply the tables' local boost to matching items.
    #[serde(default)]
    pub local_boost: bool,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

impl AggregationRequest {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            max_items: DEFAULT_MAX_ITEMS,
            source_filter: Vec::new(),
            category_filter: Vec::new(),
            min_priority: None,
            local_boost: false,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.source_filter = sources;
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.category_filter = categories;
        self
    }

    pub fn with_min_priority(mut self, min_priority: u8) -> Self {
        self.min_priority = Some(min_priority);
        self
    }

    pub fn with_local_boost(mut self) -> Self {
        self.local_boost = true;
        self
    }

    /// Whether a configured source survives the source and category filters.
    pub fn admits(&self, source: &FeedSourceConfig) -> bool {
        let source_ok = self.source_filter.is_empty()
            || self.source_filter.iter().any(|s| s == &source.source_name);
        let category_ok = self.category_filter.is_empty()
            || self.category_filter.iter().any(|c| c == &source.feed_category);
        source_ok && category_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStatus {
    Completed,
    /// The channel has no active configured sources (or they could not be loaded).
    MissingConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub channel: String,
    pub status: AggregationStatus,
    pub items: Vec<NewsItem>,
}

impl AggregationResult {
    pub fn completed(channel: &str, items: Vec<NewsItem>) -> Self {
        Self {
            channel: channel.to_string(),
            status: AggregationStatus::Completed,
            items,
        }
    }

    pub fn missing_configuration(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            status: AggregationStatus::MissingConfiguration,
            items: Vec::new(),
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.status == AggregationStatus::MissingConfiguration
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("Fetch timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid source {name}: {reason}")]
    InvalidSource { name: String, reason: String },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AggregatorError {
    /// Short error class for per-source warning lines.
    pub fn kind(&self) -> &'static str {
        match self {
            AggregatorError::Http(e) if e.is_timeout() => "timeout",
            AggregatorError::Http(e) if e.is_connect() => "connect",
            AggregatorError::Http(e) if e.is_decode() || e.is_body() => "body",
            AggregatorError::Http(_) => "request",
            AggregatorError::HttpStatus { .. } => "status",
            AggregatorError::Timeout { .. } => "timeout",
            AggregatorError::Parse(_) => "parse",
            AggregatorError::InvalidUrl(_) => "invalid_url",
            AggregatorError::InvalidSource { .. } => "invalid_source",
            AggregatorError::FeedTooLarge { .. } => "too_large",
            AggregatorError::Config(_) => "config",
            AggregatorError::Io(_) => "io",
            AggregatorError::Toml(_) => "toml",
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
