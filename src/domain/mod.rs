//! Domain layer containing business entities and contracts.
//!
//! Defines the mapping entity, the storage and code generator contracts, and
//! the asynchronous access counting pipeline. Nothing here depends on HTTP.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`code_generator`] - Short code generator trait
//! - [`access_event`] - Access counting event model
//! - [`access_worker`] - Asynchronous access counting worker
//!
//! # Access Counting Flow
//!
//! 1. HTTP handler resolves a short code
//! 2. [`access_event::AccessEvent`] is sent to a bounded channel
//! 3. [`access_worker::run_access_worker`] applies the increment with retry
//! 4. The counter is persisted via [`repositories::MappingRepository::increment_access`]

pub mod access_event;
pub mod access_worker;
pub mod code_generator;
pub mod entities;
pub mod repositories;
