//! Short code generation and validation utilities.
//!
//! Codes are drawn from the URL-safe base64 alphabet (`A-Z`, `a-z`, `0-9`,
//! `-`, `_`), 64 symbols in total, so every character carries six bits of
//! entropy.

use base64::Engine as _;
use serde_json::json;

use crate::domain::code_generator::CodeGenerator;
use crate::error::AppError;

/// Default short code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Codes that would be shadowed by fixed routes.
///
/// The allocation protocol treats a generated reserved code as a collision.
/// `/api` is only a path prefix: codes are at least four characters long, so
/// no valid code can equal it.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Uniform random code generator backed by the OS entropy source.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator producing codes of `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    /// Generates a code of the configured length.
    ///
    /// Fills `ceil(length * 6 / 8)` random bytes and encodes them as URL-safe
    /// base64 without padding. Only the first `length` characters are kept,
    /// each of which is built from six whole random bits, so every symbol is
    /// equally likely.
    ///
    /// # Panics
    ///
    /// Panics if the system random number generator fails (extremely rare).
    fn generate(&self) -> String {
        let mut buffer = vec![0u8; (self.length * 3).div_ceil(4)];

        getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

        let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buffer);
        code.truncate(self.length);
        code
    }

    fn code_length(&self) -> usize {
        self.length
    }
}

/// Returns `true` if `c` belongs to the short code alphabet.
pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Returns `true` if `code` is reserved for a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates a short code received from a client before it reaches storage.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the length differs from
/// `expected_length` or the code contains characters outside the alphabet.
pub fn validate_code(code: &str, expected_length: usize) -> Result<(), AppError> {
    if code.chars().count() != expected_length {
        return Err(AppError::bad_request(
            format!("Short code must be exactly {expected_length} characters"),
            json!({ "provided_length": code.chars().count() }),
        ));
    }

    if !code.chars().all(is_code_char) {
        return Err(AppError::bad_request(
            "Short code can only contain letters, digits, '-' and '_'",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
