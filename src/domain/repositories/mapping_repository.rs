//! Repository trait for URL mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the mapping store.
///
/// The store owns two uniqueness indexes, one on `original_url` and one on
/// `short_code`. [`MappingRepository::insert`] must be atomic with respect to
/// both: concurrent inserts of the same URL or the same code let exactly one
/// caller win and report [`AppError::Conflict`] to the others.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteMappingRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_mapping.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with `access_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the original URL or the short code
    /// already exists.
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError>;

    /// Finds a mapping by its exact original URL.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlMapping))` if found
    /// - `Ok(None)` if not found
    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Finds a mapping by its short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Increments the access counter of a mapping by one.
    ///
    /// Returns `Ok(false)` if no mapping has this code.
    async fn increment_access(&self, short_code: &str) -> Result<bool, AppError>;

    /// Counts stored mappings.
    async fn count(&self) -> Result<i64, AppError>;

    /// Sums the access counters of all mappings.
    async fn total_accesses(&self) -> Result<i64, AppError>;

    /// Lists the most accessed mappings, ties broken by creation order.
    async fn top_accessed(&self, limit: i64) -> Result<Vec<UrlMapping>, AppError>;
}
