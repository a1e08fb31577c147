//! API route configuration.

use crate::api::handlers::{
    batch_shorten_handler, shorten_handler, shorten_query_handler, stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`        - Shorten a URL (JSON body)
/// - `GET  /shorten?url=`   - Shorten a URL (query string)
/// - `POST /shorten/batch`  - Shorten several URLs
/// - `GET  /stats/{code}`   - Access statistics for a short link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shorten",
            post(shorten_handler).get(shorten_query_handler),
        )
        .route("/shorten/batch", post(batch_shorten_handler))
        .route("/stats/{code}", get(stats_handler))
}
