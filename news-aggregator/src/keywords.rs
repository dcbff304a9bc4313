//! # Keyword tables
//!
//! Fixed keyword configuration shared by the classifier, the priority scorer
//! and the tag extractor. A `KeywordTables` value is built once (built-in
//! seed or TOML file) and handed to each stage; nothing here is global.
//!
//! Category order is significant: when two categories reach the same
//! non-zero score, the one declared first wins.

use crate::types::{AggregatorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One category and the keywords that vote for it.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Upper bound for `max_tags`; items never carry more tags than this.
pub const MAX_TAGS: usize = 5;

/// Local-focus boost: items mentioning one of `keywords` in title or summary
/// gain `bonus` priority and are filed under `category`. Only applied when
/// the request asks for it.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalBoost {
    pub keywords: Vec<String>,
    pub bonus: i32,
    pub category: String,
}

impl LocalBoost {
    pub fn matches(&self, title: &str, summary: &str) -> bool {
        let (title, summary) = (title.to_lowercase(), summary.to_lowercase());
        self.keywords
            .iter()
            .any(|keyword| title.contains(keyword.as_str()) || summary.contains(keyword.as_str()))
    }
}

/// One priority bonus tier. At most one keyword per tier counts.
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityTier {
    pub name: String,
    pub bonus: i32,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordTables {
    /// Ordered (category, keywords) pairs.
    pub categories: Vec<CategoryKeywords>,
    /// Declared feed category → category used when no keyword matches.
    #[serde(default)]
    pub fallback: HashMap<String, String>,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub priority_tiers: Vec<PriorityTier>,
    /// Per-category priority adjustment; unlisted categories get 0.
    #[serde(default)]
    pub category_adjustments: HashMap<String, i32>,
    #[serde(default)]
    pub tag_keywords: Vec<String>,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    #[serde(default)]
    pub local_boost: Option<LocalBoost>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_max_tags() -> usize {
    MAX_TAGS
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl KeywordTables {
    /// Load alternate tables from a TOML file. Keywords are lower-cased on load.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AggregatorError::Toml(inner) => {
                AggregatorError::Config(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let tables: KeywordTables = toml::from_str(content)?;
        tables.validated()
    }

    fn validated(mut self) -> Result<Self> {
        if self.categories.is_empty() {
            return Err(AggregatorError::Config(
                "keyword tables declare no categories".to_string(),
            ));
        }
        if self.max_tags > MAX_TAGS {
            return Err(AggregatorError::Config(format!(
                "max_tags = {} exceeds the limit of {}",
                self.max_tags, MAX_TAGS
            )));
        }
        for category in &mut self.categories {
            lowercase_all(&mut category.keywords);
        }
        for tier in &mut self.priority_tiers {
            lowercase_all(&mut tier.keywords);
        }
        lowercase_all(&mut self.tag_keywords);
        if let Some(boost) = &mut self.local_boost {
            lowercase_all(&mut boost.keywords);
        }
        Ok(self)
    }

    /// Category used for a declared feed category when no keyword matched.
    pub fn fallback_for(&self, feed_category: &str) -> &str {
        self.fallback
            .get(feed_category)
            .map(String::as_str)
            .unwrap_or(&self.default_category)
    }

    pub fn adjustment_for(&self, category: &str) -> i32 {
        self.category_adjustments.get(category).copied().unwrap_or(0)
    }

    /// Built-in tables of the Zurich news station.
    pub fn default_seed() -> Self {
        let categories = [
            (
                "bitcoin_crypto",
                &["bitcoin", "btc", "krypto", "blockchain", "ethereum", "crypto", "defi", "nft"][..],
            ),
            (
                "wirtschaft",
                &["wirtschaft", "börse", "aktien", "unternehmen", "bank", "snb", "inflation", "finanz"][..],
            ),
            (
                "technologie",
                &["technologie", "tech", "ki", "ai", "software", "digital", "startup", "apple", "google"][..],
            ),
            (
                "weltpolitik",
                &["politik", "regierung", "parlament", "wahlen", "international", "trump", "biden"][..],
            ),
            (
                "sport",
                &["sport", "fussball", "tennis", "ski", "olympia", "wm", "em", "bundesliga"][..],
            ),
            (
                "local_zurich",
                &[
                    "schweiz", "zürich", "zurich", "basel", "bern", "genf", "lausanne",
                    "stadt zürich", "kanton zürich", "zürcher", "züri", "limmat", "see",
                    "hb zürich", "hauptbahnhof", "tram", "vbz", "stadtrat", "gemeinderat",
                ][..],
            ),
            (
                "wissenschaft",
                &["wissenschaft", "forschung", "studie", "universität", "medizin", "gesundheit"][..],
            ),
            (
                "entertainment",
                &["kultur", "film", "musik", "theater", "festival", "promi", "celebrity"][..],
            ),
        ]
        .into_iter()
        .map(|(name, keywords)| CategoryKeywords {
            name: name.to_string(),
            keywords: to_strings(keywords),
        })
        .collect();

        let fallback = [
            ("schweiz", "local_zurich"),
            ("zurich", "local_zurich"),
            ("news", "local_zurich"),
            ("wirtschaft", "wirtschaft"),
            ("business", "wirtschaft"),
            ("sport", "sport"),
            ("digital", "technologie"),
            ("technologie", "technologie"),
            ("technology", "technologie"),
            ("international", "weltpolitik"),
            ("world", "weltpolitik"),
            ("bitcoin", "bitcoin_crypto"),
            ("latest", "general"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let priority_tiers = [
            ("breaking", 3, &["eilmeldung", "breaking", "urgent", "sofort", "jetzt", "live"][..]),
            ("high", 2, &["wichtig", "bedeutend", "gross", "major", "kritisch", "skandal"][..]),
            ("bitcoin", 2, &["bitcoin", "btc", "100k", "allzeithoch", "rekord", "crash"][..]),
            (
                "economy",
                1,
                &["snb", "leitzins", "inflation", "rezession", "börsencrash", "wirtschaftskrise"][..],
            ),
        ]
        .into_iter()
        .map(|(name, bonus, keywords)| PriorityTier {
            name: name.to_string(),
            bonus,
            keywords: to_strings(keywords),
        })
        .collect();

        let category_adjustments = [
            ("bitcoin_crypto", 2),
            ("wirtschaft", 1),
            ("weltpolitik", 1),
            ("technologie", 1),
            ("local_zurich", 2),
            ("sport", -1),
            ("entertainment", -2),
            ("wissenschaft", 0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let tag_keywords = to_strings(&[
            "bitcoin", "snb", "zürich", "schweiz", "breaking", "eilmeldung", "börse", "aktien",
            "inflation", "tech", "startup", "ki", "ai", "trump", "biden", "ukraine", "china",
            "usa", "europa",
        ]);

        let local_boost = LocalBoost {
            keywords: to_strings(&[
                "zürich", "zurich", "züri", "stadt zürich", "kanton zürich", "zürcher",
            ]),
            bonus: 2,
            category: "local_zurich".to_string(),
        };

        Self {
            categories,
            fallback,
            default_category: default_category(),
            priority_tiers,
            category_adjustments,
            tag_keywords,
            max_tags: default_max_tags(),
            local_boost: Some(local_boost),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn lowercase_all(words: &mut [String]) {
    for word in words.iter_mut() {
        *word = word.to_lowercase();
    }
}
