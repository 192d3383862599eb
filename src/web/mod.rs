//! Web Module
//!
//! Expiring cache for fetched pages with per-URL access counting.

mod fetcher;
mod page_cache;

pub use fetcher::{Fetcher, HttpFetcher};
pub use page_cache::{PageCache, CACHE_WINDOW_SECS};
