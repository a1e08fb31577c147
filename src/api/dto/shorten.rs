//! DTOs for link shortening endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlMapping;
use crate::error::ErrorInfo;

/// Request to shorten a single URL.
///
/// Used both as a JSON body (`POST /api/shorten`) and as query parameters
/// (`GET /api/shorten?url=...`). The URL itself is validated by the
/// allocation protocol so that error messages are the same everywhere.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// Shortened URL returned for a successful allocation.
#[derive(Debug, Clone, Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
}

impl ShortenResponse {
    pub fn new(mapping: UrlMapping, short_url: String) -> Self {
        Self {
            original_url: mapping.original_url,
            short_url,
            short_code: mapping.short_code,
        }
    }
}

/// Request to shorten several URLs at once.
///
/// Items are plain strings and are not validated here: a malformed URL must
/// only fail its own item, never the whole batch. The upper bound is
/// configurable and enforced by the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchShortenRequest {
    #[validate(length(min = 1, message = "At least one URL is required"))]
    pub urls: Vec<String>,
}

/// Response containing batch processing results.
#[derive(Debug, Serialize)]
pub struct BatchShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Individual result for a URL in the batch, in input order.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    Success(ShortenResponse),
    Error {
        original_url: String,
        error: ErrorInfo,
    },
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
