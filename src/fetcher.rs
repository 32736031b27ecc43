use crate::traits::Transport;
use crate::types::{FeedError, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// reqwest-backed [`Transport`]. One shared client, built once.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    async fn get_body(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FeedError::network(url, e))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let body = self.get_body(url).await?;
        serde_json::from_str(&body).map_err(|e| FeedError::parse(url, e))
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.get_body(url).await
    }
}
