//! Application-wide error type and its HTTP representation.
//!
//! Every layer returns [`AppError`]. Handlers let it bubble up and axum turns it
//! into a JSON error body through the [`IntoResponse`] impl:
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in per-item batch results.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by services, repositories and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or oversized input (URL, short code, batch size).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Lookup miss for a redirect or stats request.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Uniqueness violation on insert.
    ///
    /// Consumed by the allocation protocol; never meant to reach a client.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// The allocation retry bound was exceeded.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    /// The store could not be reached.
    #[error("{message}")]
    StorageUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn storage_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns `true` for uniqueness violations.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// HTTP status used when this error is returned to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AllocationExhausted { .. } | Self::StorageUnavailable { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Conflict { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its client-facing payload.
    ///
    /// Conflicts are internal to allocation, so one that escapes is reported
    /// as a generic internal error without its storage details.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            Self::AllocationExhausted { message, details } => ErrorInfo {
                code: "allocation_exhausted",
                message: message.clone(),
                details: details.clone(),
            },
            Self::StorageUnavailable { message, details } => ErrorInfo {
                code: "storage_unavailable",
                message: message.clone(),
                details: details.clone(),
            },
            Self::Conflict { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
            Self::Internal { message, details } => ErrorInfo {
                code: "internal_error",
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Conflict { .. } => tracing::error!(error = ?self, "Conflict escaped allocation"),
            _ if status.is_server_error() => tracing::error!(error = %self, "Request failed"),
            _ => {}
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "column": violated_column(db.message()) }),
            );
        }

        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::storage_unavailable("Storage unavailable", json!({ "reason": e.to_string() }))
            }
            other => {
                tracing::error!(error = %other, "Database error");
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(e))
    }
}

/// Extracts the column name from a SQLite unique violation message
/// (`UNIQUE constraint failed: url_mappings.short_code`).
fn violated_column(message: &str) -> Option<&str> {
    message
        .rsplit_once(':')
        .map(|(_, cols)| cols.trim())
        .and_then(|cols| cols.rsplit_once('.').map(|(_, col)| col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::allocation_exhausted("x", json!({})).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::storage_unavailable("x", json!({})).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::internal("x", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_is_hidden_from_clients() {
        let err = AppError::conflict("Unique constraint violation", json!({ "column": "short_code" }));

        assert!(err.is_conflict());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let info = err.to_error_info();
        assert_eq!(info.code, "internal_error");
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::bad_request("URL is too long", json!({ "max": 2048 }));
        assert_eq!(err.to_string(), "URL is too long");
    }

    #[test]
    fn test_violated_column() {
        assert_eq!(
            violated_column("UNIQUE constraint failed: url_mappings.short_code"),
            Some("short_code")
        );
        assert_eq!(
            violated_column("UNIQUE constraint failed: url_mappings.original_url"),
            Some("original_url")
        );
        assert_eq!(violated_column("something else"), None);
    }

    #[test]
    fn test_pool_timeout_maps_to_storage_unavailable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_row_not_found_maps_to_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
