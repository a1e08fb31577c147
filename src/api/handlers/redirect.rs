//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;
use url::Url;

use crate::domain::access_event::AccessEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Validate the code format
/// 2. Look up the mapping
/// 3. Enqueue an access event for the background worker
/// 4. Return 307 Temporary Redirect
///
/// # Access Tracking
///
/// Access events go to a bounded channel and are applied asynchronously. If
/// the queue is full the increment is dropped and logged; the redirect is
/// never delayed or failed by counting.
///
/// # Errors
///
/// - 400 if the code is malformed
/// - 404 if the code is unknown
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let mapping = state.link_service.resolve(&code).await?;

    match state
        .access_sender
        .try_send(AccessEvent::new(mapping.short_code.as_str()))
    {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("shortly_access_events_dropped_total").increment(1);
            warn!(code = %event.short_code, "Access queue full, dropping event");
        }
        Err(TrySendError::Closed(event)) => {
            warn!(code = %event.short_code, "Access queue closed, dropping event");
        }
    }

    Ok(Redirect::temporary(&location(&mapping.original_url)))
}

/// Header-safe form of a stored URL.
///
/// Stored URLs are kept verbatim and may contain characters that are not
/// allowed in a header value; the parsed form is percent-encoded ASCII.
fn location(original_url: &str) -> String {
    Url::parse(original_url)
        .map(String::from)
        .unwrap_or_else(|_| original_url.to_string())
}
