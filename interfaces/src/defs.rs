use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One configured feed for one channel, as handed over by the source
/// configuration provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSourceConfig {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub channel: String,
    pub source_name: String,
    pub feed_category: String,
    pub feed_url: String,
    /// Base priority before keyword adjustments; not clamped.
    pub priority: i32,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

fn default_active() -> bool {
    true
}

/// A normalized, classified and scored news item handed to the
/// script-generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub source: String,
    pub category: String,
    pub priority: u8,
    pub tags: Vec<String>,
    pub weight: f64,
}

impl NewsItem {
    /// Ranking key: priority scaled by the source weight.
    pub fn rank_score(&self) -> f64 {
        f64::from(self.priority) * self.weight
    }
}

// Object style note:
// A NewsItem never outlives one aggregation call. Collaborators receive an
// owned Vec and are free to serialize it; nothing here is persisted.
