//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export DATABASE_URL="sqlite://shortly.db"
//! export BASE_URL="https://sho.rt"
//! export LISTEN="0.0.0.0:3000"
//! ```
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite store location (default: `sqlite://shortly.db`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PORT` - Overrides the port part of `LISTEN`
//! - `BASE_URL` - Prefix of generated short URLs (default: `http://localhost:<port>`)
//! - `CODE_LENGTH` - Short code length (default: 6, range: 4-32)
//! - `MAX_ALLOCATION_ATTEMPTS` - Code generation attempts per URL (default: 10, range: 1-100)
//! - `MAX_BATCH_SIZE` - URLs per batch request (default: 50, range: 1-1000)
//! - `MAX_URL_LENGTH` - Longest accepted URL in characters (default: 2048)
//! - `ACCESS_QUEUE_CAPACITY` - Access event buffer size (default: 10000, min: 100)
//! - `ACCESS_WORKER_CONCURRENCY` - Parallel counter updates (default: 4, range: 1-256)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::LinkSettings;
use crate::infrastructure::persistence::PoolSettings;
use crate::utils::code_generator::DEFAULT_CODE_LENGTH;
use crate::utils::url_validator::DEFAULT_MAX_URL_LENGTH;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Public prefix of short URLs, without a trailing slash.
    pub base_url: String,
    pub log_level: String,
    pub log_format: String,
    pub code_length: usize,
    pub max_allocation_attempts: usize,
    pub max_batch_size: usize,
    pub max_url_length: usize,
    pub access_queue_capacity: usize,
    /// Maximum number of counter updates processed concurrently by the access worker.
    pub access_worker_concurrency: usize,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://shortly.db".to_string());

        let listen_addr = Self::load_listen_addr()?;

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| {
                let port = listen_addr.rsplit(':').next().unwrap_or("3000");
                format!("http://localhost:{port}")
            })
            .trim_end_matches('/')
            .to_string();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            database_url,
            listen_addr,
            base_url,
            log_level,
            log_format,
            code_length: parse_var("CODE_LENGTH", DEFAULT_CODE_LENGTH)?,
            max_allocation_attempts: parse_var("MAX_ALLOCATION_ATTEMPTS", 10)?,
            max_batch_size: parse_var("MAX_BATCH_SIZE", 50)?,
            max_url_length: parse_var("MAX_URL_LENGTH", DEFAULT_MAX_URL_LENGTH)?,
            access_queue_capacity: parse_var("ACCESS_QUEUE_CAPACITY", 10_000)?,
            access_worker_concurrency: parse_var("ACCESS_WORKER_CONCURRENCY", 4)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            db_connect_timeout: parse_var("DB_CONNECT_TIMEOUT", 30)?,
        })
    }

    /// Loads the bind address.
    ///
    /// Priority:
    /// 1. `LISTEN`, with its port replaced by `PORT` if that is also set
    /// 2. `0.0.0.0:<PORT>`
    /// 3. `0.0.0.0:3000`
    fn load_listen_addr() -> Result<String> {
        let listen = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let Ok(port) = env::var("PORT") else {
            return Ok(listen);
        };

        let port: u16 = port
            .parse()
            .with_context(|| format!("PORT must be a valid port number, got '{port}'"))?;

        let host = listen
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");

        Ok(format!("{host}:{port}"))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is outside its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !(4..=32).contains(&self.code_length) {
            anyhow::bail!(
                "CODE_LENGTH must be between 4 and 32, got {}",
                self.code_length
            );
        }

        if !(1..=100).contains(&self.max_allocation_attempts) {
            anyhow::bail!(
                "MAX_ALLOCATION_ATTEMPTS must be between 1 and 100, got {}",
                self.max_allocation_attempts
            );
        }

        if !(1..=1000).contains(&self.max_batch_size) {
            anyhow::bail!(
                "MAX_BATCH_SIZE must be between 1 and 1000, got {}",
                self.max_batch_size
            );
        }

        if !(16..=65_536).contains(&self.max_url_length) {
            anyhow::bail!(
                "MAX_URL_LENGTH must be between 16 and 65536, got {}",
                self.max_url_length
            );
        }

        if self.access_queue_capacity < 100 {
            anyhow::bail!(
                "ACCESS_QUEUE_CAPACITY must be at least 100, got {}",
                self.access_queue_capacity
            );
        }

        if self.access_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "ACCESS_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.access_queue_capacity
            );
        }

        if self.access_worker_concurrency == 0 || self.access_worker_concurrency > 256 {
            anyhow::bail!(
                "ACCESS_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.access_worker_concurrency
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Settings for [`crate::application::services::LinkService`].
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            base_url: self.base_url.clone(),
            max_url_length: self.max_url_length,
            max_allocation_attempts: self.max_allocation_attempts,
        }
    }

    /// Settings for the SQLite pool.
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_connect_timeout),
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Code length: {}", self.code_length);
        tracing::info!("  Max allocation attempts: {}", self.max_allocation_attempts);
        tracing::info!("  Max batch size: {}", self.max_batch_size);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Access queue capacity: {}", self.access_queue_capacity);
    }
}

/// Parses an optional numeric variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            code_length: 6,
            max_allocation_attempts: 10,
            max_batch_size: 50,
            max_url_length: 2048,
            access_queue_capacity: 10_000,
            access_worker_concurrency: 4,
            db_max_connections: 5,
            db_connect_timeout: 30,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.access_queue_capacity = 50;
        assert!(config.validate().is_err());
        config.access_queue_capacity = 10_000;

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());
        config.database_url = "sqlite://data/shortly.db".to_string();
        assert!(config.validate().is_ok());

        config.base_url = "sho.rt".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_policy_ranges() {
        let mut config = test_config();

        config.code_length = 3;
        assert!(config.validate().is_err());
        config.code_length = 33;
        assert!(config.validate().is_err());
        config.code_length = 8;
        assert!(config.validate().is_ok());

        config.max_allocation_attempts = 0;
        assert!(config.validate().is_err());
        config.max_allocation_attempts = 1;
        assert!(config.validate().is_ok());

        config.max_batch_size = 0;
        assert!(config.validate().is_err());
        config.max_batch_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_link_settings_from_config() {
        let config = test_config();
        let settings = config.link_settings();

        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.max_url_length, 2048);
        assert_eq!(settings.max_allocation_attempts, 10);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for name in [
                "DATABASE_URL",
                "LISTEN",
                "PORT",
                "BASE_URL",
                "CODE_LENGTH",
                "MAX_BATCH_SIZE",
            ] {
                env::remove_var(name);
            }
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "sqlite://shortly.db");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.code_length, 6);
        assert_eq!(config.max_batch_size, 50);
    }

    #[test]
    #[serial]
    fn test_port_overrides_listen_port() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("LISTEN", "127.0.0.1:3000");
            env::set_var("PORT", "8080");
            env::remove_var("BASE_URL");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.base_url, "http://localhost:8080");

        // Cleanup
        unsafe {
            env::remove_var("LISTEN");
            env::remove_var("PORT");
        }
    }

    #[test]
    #[serial]
    fn test_base_url_trailing_slash_trimmed() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("BASE_URL", "https://sho.rt/");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url, "https://sho.rt");

        unsafe {
            env::remove_var("BASE_URL");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_an_error() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CODE_LENGTH", "six");
        }

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("CODE_LENGTH"));

        unsafe {
            env::remove_var("CODE_LENGTH");
        }
    }
}
