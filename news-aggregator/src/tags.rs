use crate::keywords::{KeywordTables, MAX_TAGS};
use std::sync::Arc;

/// Picks salient keyword tags for display and search downstream.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    tables: Arc<KeywordTables>,
}

impl TagExtractor {
    pub fn new(tables: Arc<KeywordTables>) -> Self {
        Self { tables }
    }

    /// Matching tag keywords in table order, at most `max_tags`.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        self.tables
            .tag_keywords
            .iter()
            .filter(|keyword| text_lower.contains(keyword.as_str()))
            .take(self.tables.max_tags.min(MAX_TAGS))
            .cloned()
            .collect()
    }
}
