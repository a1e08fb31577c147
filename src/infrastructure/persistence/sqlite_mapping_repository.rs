//! SQLite implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// SQLite repository for URL mappings.
///
/// Uniqueness of `original_url` and `short_code` is enforced by `UNIQUE`
/// constraints, so a losing concurrent insert surfaces as
/// [`AppError::Conflict`] through the `sqlx::Error` conversion.
pub struct SqliteMappingRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for SqliteMappingRepository {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let mapping = sqlx::query_as::<_, UrlMapping>(
            r#"
            INSERT INTO url_mappings (original_url, short_code, created_at, access_count)
            VALUES (?1, ?2, ?3, 0)
            RETURNING id, original_url, short_code, created_at, access_count
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.short_code)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>, AppError> {
        let mapping = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, original_url, short_code, created_at, access_count
            FROM url_mappings
            WHERE original_url = ?1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let mapping = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, original_url, short_code, created_at, access_count
            FROM url_mappings
            WHERE short_code = ?1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    async fn increment_access(&self, short_code: &str) -> Result<bool, AppError> {
        let affected = sqlx::query(
            "UPDATE url_mappings SET access_count = access_count + 1 WHERE short_code = ?1",
        )
        .bind(short_code)
        .execute(self.pool.as_ref())
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_accesses(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(access_count), 0) FROM url_mappings",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }

    async fn top_accessed(&self, limit: i64) -> Result<Vec<UrlMapping>, AppError> {
        let mappings = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, original_url, short_code, created_at, access_count
            FROM url_mappings
            ORDER BY access_count DESC, id ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(mappings)
    }
}
