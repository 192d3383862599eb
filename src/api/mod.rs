//! API Module
//!
//! HTTP handlers and routing for the service REST API.
//!
//! # Endpoints
//! - `POST /store` - Store a value under a generated key
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /replay/:operation` - Replay an operation's call log
//! - `GET /page?url=` - Fetch a page through the expiring cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
