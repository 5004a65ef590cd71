//! Axum HTTP API for a video review session.
//!
//! This crate provides:
//! - The review endpoints (init, page views, labels, navigation, search, save)
//! - Lazy session bootstrap with end-of-session save on reload and shutdown
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, StorageBackend};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
