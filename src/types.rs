use serde::{Deserialize, Serialize};

/// A normalized story record, the common shape every source is mapped into.
///
/// Every field is always present: adapters substitute safe defaults for
/// anything the upstream payload omits, so consumers never see missing
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Upstream-native identifier, unique within its source for the session.
    pub id: String,
    pub title: String,
    /// External link, falling back to the source-native permalink for
    /// self/text posts.
    pub url: String,
    pub score: u32,
    /// Display handle; may be empty for anonymous/deleted authors.
    pub author: String,
    /// Unix seconds.
    pub time: i64,
    /// Display label for the link host, or "Self" when not resolvable.
    pub domain: String,
    /// Source-native discussion permalink.
    pub comments_url: String,
}

/// One adapter fetch's output: stories in upstream order plus whether the
/// source has anything left after this batch.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub stories: Vec<Story>,
    pub exhausted: bool,
}

impl Batch {
    /// An empty batch that also signals the end of the source.
    pub fn exhausted() -> Self {
        Self {
            stories: Vec::new(),
            exhausted: true,
        }
    }
}

/// Observable snapshot of the controller's per-category session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSession {
    pub category: String,
    /// Sticky once set; cleared only by reactivating a category.
    pub exhausted: bool,
    /// True exactly while one upstream request is outstanding.
    pub fetch_in_flight: bool,
    /// Count of stories delivered to the sink this session; doubles as the
    /// next batch's starting position index.
    pub delivered: usize,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; PrismBot/1.0; +http://prism.glassgallery.my.id)"
                .to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("malformed payload from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("unknown category {key:?}")]
    UnknownCategory { key: String },
}

impl FeedError {
    pub fn network(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Network and status errors leave the session retryable; they never
    /// mark a category exhausted.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
