//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a/b?c=1" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "shortUrl": "http://localhost:8000/r/Xk3_a9", "id": "Xk3_a9" }
/// ```
///
/// # Errors
///
/// - 400 `InvalidUrl` if the body is not JSON, or the URL is missing or not an
///   absolute HTTP(S) URL
/// - 503 `StoreUnavailable` if the durable write failed
/// - 503 `AllocationExhausted` if no free identifier was found
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state.link_service.create(&payload.url).await?;
    let short_url = state.link_service.short_url(&record.identifier);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_url,
            id: record.identifier,
        }),
    ))
}
