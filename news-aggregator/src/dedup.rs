//! Near-duplicate removal by title-word Jaccard similarity.
//!
//! Every candidate is compared with every accepted title, so a batch costs
//! O(n²) comparisons. Batches are tens of items per run; larger batches would
//! need shingling or an inverted index.

use crate::types::NewsItem;
use crate::utils::text::strip_punctuation;
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Lower-cased, punctuation-free word set of a title.
pub fn title_words(title: &str) -> HashSet<String> {
    strip_punctuation(title)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// |A ∩ B| / |A ∪ B|. Two empty sets are not considered similar.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Keeps the first of every group of near-duplicate titles, in input order.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn deduplicate(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        let mut accepted_titles: Vec<HashSet<String>> = Vec::with_capacity(items.len());
        let mut unique_items = Vec::with_capacity(items.len());

        for item in items {
            let words = title_words(&item.title);
            let is_duplicate = accepted_titles
                .iter()
                .any(|seen| jaccard(&words, seen) > self.threshold);

            if is_duplicate {
                debug!("Dropping near-duplicate: {} ({})", item.title, item.source);
                continue;
            }
            accepted_titles.push(words);
            unique_items.push(item);
        }

        unique_items
    }
}
