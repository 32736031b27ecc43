use crate::types::{FeedError, Result};
use std::collections::HashMap;

/// Which pagination strategy a category uses, and where it points.
///
/// Matched only inside `sources::adapter_for`; nothing outside the adapter
/// boundary branches on the source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Hacker News top stories (ranked id list, paged by offset).
    HackerNews,
    /// A subreddit hot listing (opaque `after` continuation token).
    Subreddit { path: String },
    /// A plain syndication feed (single page, no pagination).
    Feed { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    /// Human-readable label for navigation.
    pub name: String,
    pub source: SourceConfig,
}

/// Static mapping from category key to adapter configuration.
pub struct CategoryRegistry {
    categories: HashMap<String, CategorySpec>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self {
            categories: HashMap::new(),
        }
    }

    /// The stock category catalog.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.insert("tech", "Tech", SourceConfig::HackerNews);

        for (key, name, path) in [
            ("ai", "AI", "r/ArtificialIntelligence"),
            ("design", "Design", "r/Design"),
            ("world", "World", "r/worldnews"),
            ("science", "Science", "r/science"),
            ("space", "Space", "r/space"),
            ("business", "Business", "r/economics"),
            ("gaming", "Gaming", "r/Games"),
        ] {
            registry.insert(
                key,
                name,
                SourceConfig::Subreddit {
                    path: path.to_string(),
                },
            );
        }

        for (key, name, url) in [
            ("verge", "The Verge", "https://www.theverge.com/rss/index.xml"),
            ("wired", "Wired", "https://www.wired.com/feed/rss"),
            ("techcrunch", "TechCrunch", "https://techcrunch.com/feed/"),
            ("ars", "Ars Technica", "https://feeds.arstechnica.com/arstechnica/index"),
            ("engadget", "Engadget", "https://www.engadget.com/rss.xml"),
        ] {
            registry.insert(key, name, SourceConfig::Feed { url: url.to_string() });
        }

        registry
    }

    pub fn insert(&mut self, key: &str, name: &str, source: SourceConfig) {
        self.categories.insert(
            key.to_string(),
            CategorySpec {
                name: name.to_string(),
                source,
            },
        );
    }

    /// Look up a category, failing fast on an unknown key rather than
    /// silently defaulting.
    pub fn resolve(&self, key: &str) -> Result<&CategorySpec> {
        self.categories
            .get(key)
            .ok_or_else(|| FeedError::UnknownCategory {
                key: key.to_string(),
            })
    }

    /// Category keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
