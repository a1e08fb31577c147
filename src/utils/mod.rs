//! Utility functions for code generation and URL processing.
//!
//! - [`code_generator`] - Random short code generation and code validation
//! - [`url_validator`] - Validation of URLs submitted for shortening

pub mod code_generator;
pub mod url_validator;
