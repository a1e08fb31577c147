//! Handlers for link shortening endpoints.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{
    BatchShortenRequest, BatchShortenResponse, BatchSummary, ShortenRequest, ShortenResponse,
    ShortenResultItem,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or returns the existing) short link for a URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a" }
/// ```
///
/// # Response
///
/// `201 Created` when a new mapping was stored, `200 OK` when the URL was
/// already shortened. The body is the same in both cases:
///
/// ```json
/// {
///   "original_url": "https://example.com/a",
///   "short_url": "http://localhost:3000/Ab3_x9",
///   "short_code": "Ab3_x9"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is invalid
/// - 503 if no free code was found within the attempt budget
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    shorten_one(&state, &payload.url).await
}

/// Query-string variant of [`shorten_handler`].
///
/// # Endpoint
///
/// `GET /api/shorten?url=https://example.com/a`
pub async fn shorten_query_handler(
    State(state): State<AppState>,
    Query(params): Query<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    shorten_one(&state, &params.url).await
}

async fn shorten_one(
    state: &AppState,
    url: &str,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let allocation = state.link_service.allocate(url).await?;

    let status = if allocation.is_new {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let short_url = state.link_service.short_url(&allocation.mapping.short_code);

    Ok((
        status,
        Json(ShortenResponse::new(allocation.mapping, short_url)),
    ))
}

/// Shortens several URLs in one request.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Batch Processing
///
/// URLs are processed sequentially and independently, in input order. A
/// failing item carries its own error and does not affect the others. Two
/// identical URLs in one batch resolve to the same code.
///
/// # Request Body
///
/// ```json
/// { "urls": ["https://example.com/a", "not a url"] }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 2, "successful": 1, "failed": 1 },
///   "items": [
///     {
///       "original_url": "https://example.com/a",
///       "short_url": "http://localhost:3000/Ab3_x9",
///       "short_code": "Ab3_x9"
///     },
///     {
///       "original_url": "not a url",
///       "error": { "code": "validation_error", "message": "Invalid URL", "details": { ... } }
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request, before any item is processed, if the list is
/// empty or longer than the configured batch limit.
pub async fn batch_shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<BatchShortenRequest>,
) -> Result<Json<BatchShortenResponse>, AppError> {
    payload.validate()?;

    let total = payload.urls.len();
    if total > state.max_batch_size {
        return Err(AppError::bad_request(
            "Too many URLs in batch",
            json!({ "max": state.max_batch_size, "provided": total }),
        ));
    }

    let mut items = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for url in payload.urls {
        match state.link_service.allocate(&url).await {
            Ok(allocation) => {
                successful += 1;
                let short_url = state.link_service.short_url(&allocation.mapping.short_code);
                items.push(ShortenResultItem::Success(ShortenResponse::new(
                    allocation.mapping,
                    short_url,
                )));
            }
            Err(err) => {
                failed += 1;
                items.push(ShortenResultItem::Error {
                    original_url: url,
                    error: err.to_error_info(),
                });
            }
        }
    }

    Ok(Json(BatchShortenResponse {
        summary: BatchSummary {
            total,
            successful,
            failed,
        },
        items,
    }))
}
