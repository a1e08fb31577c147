//! SQLite connection pool setup and schema migrations.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

/// Embedded migrations from `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool settings applied when opening the store.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Returns `true` if `database_url` points at an in-memory database.
pub fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Opens the store and applies pending migrations.
///
/// File databases are created if missing and run in WAL mode. In-memory
/// databases live as long as their connection, so they get a single
/// connection that is never reaped.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database cannot be opened, or
/// a migration fails. Callers treat this as fatal at startup.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<SqlitePool> {
    let mut connect_options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool_options = SqlitePoolOptions::new().acquire_timeout(settings.acquire_timeout);

    let pool_options = if is_in_memory(database_url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        pool_options.max_connections(settings.max_connections)
    };

    let pool = pool_options
        .connect_with(connect_options)
        .await
        .context("Failed to open database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}
