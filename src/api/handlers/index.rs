//! Liveness banner.

/// `GET /`
pub async fn index_handler() -> &'static str {
    "URL Shortener API is running"
}
