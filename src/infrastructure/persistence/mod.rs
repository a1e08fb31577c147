//! SQLite persistence.
//!
//! - [`database`] - Pool setup and embedded migrations
//! - [`SqliteMappingRepository`] - Mapping storage and retrieval

pub mod database;
pub mod sqlite_mapping_repository;

pub use database::{PoolSettings, connect};
pub use sqlite_mapping_repository::SqliteMappingRepository;
