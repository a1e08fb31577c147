//! # Shortly
//!
//! A small URL shortening service built with Axum and SQLite.
//!
//! ## Architecture
//!
//! The crate keeps a clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository and generator traits, access worker
//! - **Application Layer** ([`application`]) - The allocation protocol and lookups
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite pool, migrations and repository
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random, URL-safe short codes with collision retry
//! - One code per URL, even under concurrent requests
//! - Batch shortening with per-item results
//! - Asynchronous access counting off the redirect path
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://shortly.db"
//! cargo run
//! ```
//!
//! Migrations are embedded and applied on startup.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, LinkSettings};
    pub use crate::domain::entities::{Allocation, NewUrlMapping, UrlMapping};
    pub use crate::domain::repositories::MappingRepository;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
