use crate::keywords::KeywordTables;
use std::sync::Arc;

pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 10;

/// Computes the final item priority from the source's base priority,
/// keyword tiers and the category adjustment.
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    tables: Arc<KeywordTables>,
}

impl PriorityScorer {
    pub fn new(tables: Arc<KeywordTables>) -> Self {
        Self { tables }
    }

    /// Unclamped score. Every tier adds its bonus at most once.
    pub fn raw_score(&self, text: &str, category: &str, base_priority: i32) -> i32 {
        let text_lower = text.to_lowercase();

        let tier_bonus: i32 = self
            .tables
            .priority_tiers
            .iter()
            .filter(|tier| {
                tier.keywords
                    .iter()
                    .any(|keyword| text_lower.contains(keyword.as_str()))
            })
            .map(|tier| tier.bonus)
            .sum();

        base_priority
            .saturating_add(tier_bonus)
            .saturating_add(self.tables.adjustment_for(category))
    }

    /// Final priority in `[1, 10]`.
    pub fn score(&self, text: &str, category: &str, base_priority: i32) -> u8 {
        clamp_priority(self.raw_score(text, category, base_priority))
    }
}

pub fn clamp_priority(raw: i32) -> u8 {
    raw.clamp(MIN_PRIORITY, MAX_PRIORITY) as u8
}
