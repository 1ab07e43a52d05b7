//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Liveness banner
//! - `POST /shorten`   - Create a short link (rate limited)
//! - `GET  /r/{id}`    - Short link redirect
//! - `GET  /urls`      - Paginated link listing
//! - `GET  /health`    - Health check: store, cache, click queue
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link creation
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    health_handler, index_handler, list_links_handler, redirect_handler, shorten_handler,
};
use crate::api::middleware::rate_limit::{self, RateLimitMode};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware without path normalization.
///
/// Integration tests drive this router directly.
pub fn api_router(state: AppState, rate_limit: RateLimitMode) -> Router {
    let shorten = rate_limit::apply(
        Router::new().route("/shorten", post(shorten_handler)),
        rate_limit,
    );

    Router::new()
        .route("/", get(index_handler))
        .route("/r/{id}", get(redirect_handler))
        .route("/urls", get(list_links_handler))
        .route("/health", get(health_handler))
        .merge(shorten)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = api_router(state, RateLimitMode::from_behind_proxy(behind_proxy));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
