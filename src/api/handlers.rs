//! API Handlers
//!
//! HTTP request handlers exposing the call-tracking cache and the page cache.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::{CacheError, Result};
use crate::kv::KvStore;
use crate::models::{
    GetQuery, GetResponse, HealthResponse, PageQuery, PageResponse, ReplayResponse, StoreRequest,
    StoreResponse, ValueFormat,
};
use crate::tracking::{Cache, Value};
use crate::web::{Fetcher, PageCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Call-tracking cache
    pub cache: Arc<Cache>,
    /// Expiring page cache
    pub pages: Arc<PageCache>,
}

impl AppState {
    /// Creates a new AppState from already built components.
    pub fn new(cache: Cache, pages: PageCache) -> Self {
        Self {
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        }
    }

    /// Builds both components over one store handle.
    ///
    /// The cache flushes the store on construction, so this wipes any
    /// existing keys.
    pub async fn build(
        store: Arc<dyn KvStore>,
        fetcher: Arc<dyn Fetcher>,
        page_cache_ttl: u64,
    ) -> Result<Self> {
        let cache = Cache::new(store.clone()).await?;
        let pages = PageCache::with_ttl(store, fetcher, page_cache_ttl);
        Ok(Self::new(cache, pages))
    }
}

/// Handler for POST /store
///
/// Stores a value under a generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value by key, decoded as text or (`?as=int`) as an integer.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let value: Option<Value> = match query.format {
        ValueFormat::Str => state.cache.get_str(&key).await?.map(Into::into),
        ValueFormat::Int => state.cache.get_int(&key).await?.map(Into::into),
    };

    match value {
        Some(value) => Ok(Json(GetResponse { key, value })),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /replay/:operation
///
/// Returns the counter and paired call log of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let calls = state.cache.call_count(&operation).await?;
    let history = state.cache.history(&operation).await?;
    Ok(Json(ReplayResponse::new(calls, &history)))
}

/// Handler for GET /page
///
/// Returns the page at `?url=`, served from cache inside the window.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.pages.get_page(&query.url).await?;
    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
