pub mod hacker_news;
pub mod reddit;
pub mod rss;

pub use hacker_news::HackerNewsSource;
pub use reddit::RedditSource;
pub use rss::RssSource;

use crate::registry::SourceConfig;
use crate::traits::{SourceAdapter, Transport};
use std::sync::Arc;
use url::Url;

/// Sentinel domain label for items without a resolvable external link.
pub const SELF_DOMAIN: &str = "Self";

/// Build a fresh adapter (and therefore a fresh cursor) for a source
/// configuration. The only place the source kind is branched on.
pub fn adapter_for(
    config: &SourceConfig,
    transport: Arc<dyn Transport>,
) -> Box<dyn SourceAdapter> {
    match config {
        SourceConfig::HackerNews => Box::new(HackerNewsSource::new(transport)),
        SourceConfig::Subreddit { path } => Box::new(RedditSource::new(transport, path.clone())),
        SourceConfig::Feed { url } => Box::new(RssSource::new(transport, url.clone())),
    }
}

/// Display label for a link's host: the hostname with a leading "www."
/// stripped, or the "Self" sentinel when the URL is absent or unparsable.
pub(crate) fn domain_label(url: Option<&str>) -> String {
    url.and_then(|raw| Url::parse(raw).ok())
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
        })
        .unwrap_or_else(|| SELF_DOMAIN.to_string())
}
