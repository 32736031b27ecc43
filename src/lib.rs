pub mod controller;
pub mod fetcher;
pub mod registry;
pub mod sources;
pub mod traits;
pub mod types;

pub use controller::FeedController;
pub use fetcher::HttpTransport;
pub use registry::{CategoryRegistry, CategorySpec, SourceConfig};
pub use traits::{Sink, SourceAdapter, Transport};
pub use types::{Batch, FeedError, FeedSession, FetchConfig, Result, Story};
