//! Core domain entities.
//!
//! The service has a single persistent entity, [`UrlMapping`]. Creation input
//! is modeled separately as [`NewUrlMapping`], and the outcome of the
//! allocation protocol as [`Allocation`].

pub mod url_mapping;

pub use url_mapping::{Allocation, NewUrlMapping, UrlMapping};
