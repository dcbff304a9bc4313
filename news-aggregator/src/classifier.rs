use crate::keywords::KeywordTables;
use std::sync::Arc;

/// Assigns a topic category by counting keyword hits per category.
#[derive(Debug, Clone)]
pub struct Classifier {
    tables: Arc<KeywordTables>,
}

impl Classifier {
    pub fn new(tables: Arc<KeywordTables>) -> Self {
        Self { tables }
    }

    /// Number of keywords of each category found in `text`, in declaration order.
    pub fn score_categories<'a>(&'a self, text: &str) -> Vec<(&'a str, usize)> {
        let text_lower = text.to_lowercase();
        self.tables
            .categories
            .iter()
            .map(|category| {
                let hits = category
                    .keywords
                    .iter()
                    .filter(|keyword| text_lower.contains(keyword.as_str()))
                    .count();
                (category.name.as_str(), hits)
            })
            .collect()
    }

    /// Highest-scoring category; the earliest declared wins a tie. Falls back
    /// to the mapping of `feed_category` when nothing matches.
    pub fn classify(&self, text: &str, feed_category: &str) -> String {
        let mut best: Option<(&str, usize)> = None;
        for (name, hits) in self.score_categories(text) {
            // strict comparison keeps the first declared category on ties
            if hits > best.map_or(0, |(_, h)| h) {
                best = Some((name, hits));
            }
        }

        match best {
            Some((name, _)) => name.to_string(),
            None => self.tables.fallback_for(feed_category).to_string(),
        }
    }
}
