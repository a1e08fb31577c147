//! URL mapping entity linking an original URL to its short code.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A stored mapping between an original URL and its short code.
///
/// Mappings are immutable once created except for `access_count`, which the
/// access worker increments after each successful redirect.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UrlMapping {
    /// Surrogate key, used for storage ordering only.
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub access_count: i64,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        access_count: i64,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
            access_count,
        }
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub original_url: String,
    pub short_code: String,
}

/// Result of allocating a short code for a URL.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub mapping: UrlMapping,
    /// `true` if this call created the mapping, `false` if it already existed.
    pub is_new: bool,
}
