use crate::classifier::Classifier;
use crate::dedup::Deduplicator;
use crate::keywords::{KeywordTables, LocalBoost};
use crate::priority::{clamp_priority, PriorityScorer};
use crate::tags::TagExtractor;
use crate::types::{FeedSourceConfig, NewsItem, ParsedEntry};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Classifies, scores and tags parsed entries of one source.
#[derive(Debug, Clone)]
pub struct ItemProcessor {
    classifier: Classifier,
    scorer: PriorityScorer,
    tagger: TagExtractor,
    local_boost: Option<LocalBoost>,
}

impl ItemProcessor {
    pub fn new(tables: Arc<KeywordTables>) -> Self {
        Self {
            classifier: Classifier::new(tables.clone()),
            scorer: PriorityScorer::new(tables.clone()),
            local_boost: tables.local_boost.clone(),
            tagger: TagExtractor::new(tables),
        }
    }

    /// Classify, score and tag one entry. With `local_boost` set, entries
    /// matching the tables' local boost keywords gain its bonus before the
    /// priority is clamped and move to its category.
    pub fn process(
        &self,
        entry: ParsedEntry,
        source: &FeedSourceConfig,
        local_boost: bool,
    ) -> NewsItem {
        let text = entry.analysis_text();
        let mut category = self.classifier.classify(&text, &source.feed_category);
        let mut raw_priority = self.scorer.raw_score(&text, &category, source.priority);

        let boost = self
            .local_boost
            .as_ref()
            .filter(|boost| local_boost && boost.matches(&entry.title, &entry.summary));
        if let Some(boost) = boost {
            debug!("Local boost for '{}'", entry.title);
            raw_priority = raw_priority.saturating_add(boost.bonus);
            category = boost.category.clone();
        }

        let priority = clamp_priority(raw_priority);
        let tags = self.tagger.extract(&text);

        NewsItem {
            title: entry.title,
            summary: entry.summary,
            link: entry.link,
            published: entry.published,
            source: source.source_name.clone(),
            category,
            priority,
            tags,
            weight: source.weight,
        }
    }
}

/// A synchronous pass over the merged item list.
pub trait ProcessingStage: Send + Sync {
    fn process(&self, items: Vec<NewsItem>) -> Vec<NewsItem>;

    fn stage_name(&self) -> String;
}

/// Drops near-duplicate titles, first seen wins.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationStage {
    deduplicator: Deduplicator,
}

impl DeduplicationStage {
    pub fn new(deduplicator: Deduplicator) -> Self {
        Self { deduplicator }
    }
}

impl ProcessingStage for DeduplicationStage {
    fn process(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        let before = items.len();
        let unique = self.deduplicator.deduplicate(items);
        debug!("Deduplication kept {} of {} items", unique.len(), before);
        unique
    }

    fn stage_name(&self) -> String {
        "deduplication".to_string()
    }
}

/// Keeps only items at or above a minimum priority.
pub struct PriorityFilterStage {
    min_priority: u8,
}

impl PriorityFilterStage {
    pub fn new(min_priority: u8) -> Self {
        Self { min_priority }
    }
}

impl ProcessingStage for PriorityFilterStage {
    fn process(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        items
            .into_iter()
            .filter(|item| item.priority >= self.min_priority)
            .collect()
    }

    fn stage_name(&self) -> String {
        "priority_filter".to_string()
    }
}

/// Sorts by `priority × weight` (newest first on ties) and truncates.
pub struct RankingStage {
    max_items: usize,
}

impl RankingStage {
    pub fn new(max_items: usize) -> Self {
        Self { max_items }
    }
}

impl ProcessingStage for RankingStage {
    fn process(&self, mut items: Vec<NewsItem>) -> Vec<NewsItem> {
        items.sort_by(compare_rank);
        items.truncate(self.max_items);
        items
    }

    fn stage_name(&self) -> String {
        "ranking".to_string()
    }
}

/// Descending ranking order: higher `priority × weight` first, then newer.
/// A NaN key ranks below every other item.
pub fn compare_rank(a: &NewsItem, b: &NewsItem) -> Ordering {
    rank_key(b)
        .total_cmp(&rank_key(a))
        .then_with(|| b.published.cmp(&a.published))
}

fn rank_key(item: &NewsItem) -> f64 {
    let score = item.rank_score();
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}
