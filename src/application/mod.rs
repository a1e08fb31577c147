//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a single entry point for the allocation protocol.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code allocation and lookup

pub mod services;
