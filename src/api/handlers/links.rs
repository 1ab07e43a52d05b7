//! Administrative link listing.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::LinkRecord;
use crate::error::AppError;
use crate::state::AppState;

/// Lists stored links, newest first.
///
/// # Endpoint
///
/// `GET /urls?page=1&page_size=25`
///
/// # Errors
///
/// - 400 if pagination parameters are out of range
/// - 503 `StoreUnavailable` if the store cannot be read
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<LinkRecord>>, AppError> {
    let (page, page_size) = params.validate().map_err(AppError::BadRequest)?;

    let records = state.link_service.list(page, page_size).await?;

    Ok(Json(records))
}
