//! Page Cache Module
//!
//! Time-boxed cache in front of a [`Fetcher`], with per-URL access counting.
//!
//! Keys per URL:
//! - `count:<url>` - every access, hit or miss; never expires
//! - `result:<url>` - cached content, written with a TTL of the cache window
//! - `hits:<url>` - hits served since the slot was last populated

use std::sync::Arc;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::kv::KvStore;
use crate::web::Fetcher;

/// Seconds a fetched page stays cached.
pub const CACHE_WINDOW_SECS: u64 = 10;

fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

fn result_key(url: &str) -> String {
    format!("result:{}", url)
}

fn hits_key(url: &str) -> String {
    format!("hits:{}", url)
}

// == Page Cache ==
/// Caches fetched content per URL for a fixed window.
///
/// Expiry is left to the store. Concurrent misses on the same URL are not
/// coalesced; each one fetches.
pub struct PageCache {
    store: Arc<dyn KvStore>,
    fetcher: Arc<dyn Fetcher>,
    ttl_seconds: u64,
}

impl PageCache {
    // == Constructor ==
    /// Creates a page cache with the default window of [`CACHE_WINDOW_SECS`].
    pub fn new(store: Arc<dyn KvStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_ttl(store, fetcher, CACHE_WINDOW_SECS)
    }

    /// Creates a page cache with a custom window in seconds.
    pub fn with_ttl(store: Arc<dyn KvStore>, fetcher: Arc<dyn Fetcher>, ttl_seconds: u64) -> Self {
        Self {
            store,
            fetcher,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    // == Get Page ==
    /// Returns the content for `url`, from cache when possible.
    ///
    /// The access counter is bumped before anything else, so it stays
    /// incremented even if the fetch fails.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        self.store.incr(&count_key(url)).await?;

        if let Some(cached) = self.store.get(&result_key(url)).await? {
            self.store.incr(&hits_key(url)).await?;
            debug!(url, "Page cache hit");
            return String::from_utf8(cached).map_err(|_| {
                CacheError::InvalidValue(format!("cached page for '{}' is not valid UTF-8", url))
            });
        }

        debug!(url, "Page cache miss");
        let content = self.fetcher.fetch(url).await?;
        self.store.set(&hits_key(url), b"0".to_vec()).await?;
        self.store
            .setex(&result_key(url), self.ttl_seconds, content.clone().into_bytes())
            .await?;
        Ok(content)
    }

    // == Counters ==
    /// Number of `get_page` calls for `url`, hits and misses alike.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        self.read_counter(&count_key(url)).await
    }

    /// Cache hits served for `url` since its slot was last populated.
    pub async fn hits_since_refresh(&self, url: &str) -> Result<i64> {
        self.read_counter(&hits_key(url)).await
    }

    async fn read_counter(&self, key: &str) -> Result<i64> {
        match self.store.get(key).await? {
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| CacheError::NotAnInteger(key.to_string())),
            None => Ok(0),
        }
    }
}
