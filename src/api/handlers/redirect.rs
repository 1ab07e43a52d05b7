//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an identifier to its target URL.
///
/// # Endpoint
///
/// `GET /r/{id}`
///
/// # Request Flow
///
/// 1. Check the resolution cache
/// 2. On miss, read the durable store and repopulate the cache
/// 3. Queue a click increment (never awaited)
/// 4. Return 302 Found
///
/// # Errors
///
/// Returns 404 Not Found if the identifier doesn't exist.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target_url = state.link_service.resolve(&id).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]))
}
