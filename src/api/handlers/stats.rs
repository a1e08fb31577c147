//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the mapping behind a short code together with its access count.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "original_url": "https://example.com/a",
///   "short_code": "Ab3_x9",
///   "created_at": "2025-01-01T00:00:00Z",
///   "access_count": 42
/// }
/// ```
///
/// The count is eventually consistent: recent redirects may still be queued.
///
/// # Errors
///
/// - 400 if the code is malformed
/// - 404 if the code is unknown
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let mapping = state.link_service.resolve(&code).await?;

    Ok(Json(StatsResponse::from(mapping)))
}
