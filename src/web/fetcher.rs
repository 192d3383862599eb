//! Content Fetchers
//!
//! The outbound fetch wrapped by the page cache.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

// == Fetcher Trait ==
/// Retrieves the content behind a target identifier, typically a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// Fetches page bodies over HTTP with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Returns the response body as text whatever the status code; only
    /// transport failures are errors.
    async fn fetch(&self, target: &str) -> Result<String> {
        let response = self.client.get(target).send().await?;
        debug!(url = target, status = %response.status(), "Fetched page");
        Ok(response.text().await?)
    }
}
