#![allow(dead_code)]

use chrono::Utc;
use shortly::application::services::{LinkService, LinkSettings};
use shortly::domain::access_event::AccessEvent;
use shortly::domain::entities::UrlMapping;
use shortly::infrastructure::persistence::{PoolSettings, SqliteMappingRepository, connect};
use shortly::state::AppState;
use shortly::utils::code_generator::RandomCodeGenerator;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "http://sho.rt";

/// Fresh, migrated in-memory store.
pub async fn test_pool() -> Arc<SqlitePool> {
    let pool = connect("sqlite::memory:", &PoolSettings::default())
        .await
        .unwrap();
    Arc::new(pool)
}

/// Migrated store backed by a file in `dir`, with several connections.
pub async fn file_pool(dir: &Path) -> Arc<SqlitePool> {
    let url = format!("sqlite://{}", dir.join("shortly.db").display());
    let pool = connect(&url, &PoolSettings::default()).await.unwrap();
    Arc::new(pool)
}

pub async fn create_test_mapping(pool: &SqlitePool, code: &str, url: &str) -> UrlMapping {
    sqlx::query_as::<_, UrlMapping>(
        "INSERT INTO url_mappings (original_url, short_code, created_at, access_count)
         VALUES (?1, ?2, ?3, 0)
         RETURNING id, original_url, short_code, created_at, access_count",
    )
    .bind(url)
    .bind(code)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn access_count(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT access_count FROM url_mappings WHERE short_code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn test_settings() -> LinkSettings {
    LinkSettings {
        base_url: TEST_BASE_URL.to_string(),
        ..LinkSettings::default()
    }
}

pub fn create_link_service(
    pool: Arc<SqlitePool>,
) -> LinkService<SqliteMappingRepository, RandomCodeGenerator> {
    LinkService::new(
        Arc::new(SqliteMappingRepository::new(pool)),
        Arc::new(RandomCodeGenerator::default()),
        test_settings(),
    )
}

pub fn create_test_state(pool: Arc<SqlitePool>) -> (AppState, mpsc::Receiver<AccessEvent>) {
    create_test_state_with(pool, 50, 100)
}

pub fn create_test_state_with(
    pool: Arc<SqlitePool>,
    max_batch_size: usize,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<AccessEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let link_service = Arc::new(create_link_service(pool));

    (AppState::new(link_service, tx, max_batch_size), rx)
}
