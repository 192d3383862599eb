//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_handler, health_handler, page_handler, replay_handler, store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /store` - Store a value under a generated key
/// - `GET /get/:key` - Retrieve a value by key (`?as=int` for integers)
/// - `GET /replay/:operation` - Call counter and call log of an operation
/// - `GET /page?url=` - Fetch a page through the expiring cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/store", post(store_handler))
        .route("/get/:key", get(get_handler))
        .route("/replay/:operation", get(replay_handler))
        .route("/page", get(page_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
