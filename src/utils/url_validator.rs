//! Validation of URLs submitted for shortening.
//!
//! URLs are stored exactly as submitted apart from trimming surrounding
//! whitespace, so deduplication is an exact string match. No case folding,
//! port stripping or fragment removal happens here.

use url::Url;

/// Default upper bound on the length of an original URL, in characters.
pub const DEFAULT_MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates `input` and returns the trimmed URL that will be stored.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed; nothing else is rewritten
/// 2. The trimmed URL must be at most `max_length` characters
/// 3. It must parse as an absolute URL
/// 4. Only `http` and `https` are accepted
/// 5. A host is required
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule that fails.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     validate_url("  https://example.com/a  ", 2048).unwrap(),
///     "https://example.com/a"
/// );
/// assert!(validate_url("not-a-url", 2048).is_err());
/// ```
pub fn validate_url(input: &str, max_length: usize) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let length = trimmed.chars().count();
    if length > max_length {
        return Err(UrlValidationError::TooLong {
            max: max_length,
            actual: length,
        });
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}
