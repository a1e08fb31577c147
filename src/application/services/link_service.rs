//! Short link allocation and lookup service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::code_generator::CodeGenerator;
use crate::domain::entities::{Allocation, NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::{is_reserved, validate_code};
use crate::utils::url_validator::{DEFAULT_MAX_URL_LENGTH, validate_url};

/// Default bound on code generation attempts per allocation.
pub const DEFAULT_MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// Tunables for [`LinkService`].
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Prefix for short URLs, e.g. `https://sho.rt`.
    pub base_url: String,
    pub max_url_length: usize,
    pub max_allocation_attempts: usize,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            max_allocation_attempts: DEFAULT_MAX_ALLOCATION_ATTEMPTS,
        }
    }
}

/// Service for allocating and resolving short links.
///
/// Implements the allocation protocol: an original URL maps to exactly one
/// short code, repeated requests return the same code, and concurrent
/// requests for the same URL converge on a single mapping.
pub struct LinkService<R: MappingRepository, G: CodeGenerator> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: LinkSettings,
}

impl<R: MappingRepository, G: CodeGenerator> LinkService<R, G> {
    /// Creates a new link service.
    pub fn new(repository: Arc<R>, generator: Arc<G>, settings: LinkSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Returns the short code for `original_url`, allocating one if needed.
    ///
    /// # Protocol
    ///
    /// 1. Trim and validate the URL
    /// 2. Return the existing mapping if the exact URL is already stored
    /// 3. Otherwise, up to `max_allocation_attempts` times:
    ///    - generate a candidate code, skipping reserved or stored codes
    ///    - insert it; the store rejects duplicate URLs and codes atomically
    ///    - on a rejected insert, re-check by URL: a concurrent request may
    ///      have stored this URL first, in which case its mapping is returned
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed or too long.
    ///
    /// Returns [`AppError::AllocationExhausted`] if every attempt collided.
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on
    /// database errors.
    pub async fn allocate(&self, original_url: &str) -> Result<Allocation, AppError> {
        let url = validate_url(original_url, self.settings.max_url_length).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.repository.find_by_url(&url).await? {
            return Ok(Self::existing(existing));
        }

        let max_attempts = self.settings.max_allocation_attempts;

        for attempt in 1..=max_attempts {
            let candidate = self.generator.generate();

            if is_reserved(&candidate) || self.repository.find_by_code(&candidate).await?.is_some()
            {
                debug!(attempt, code = %candidate, "Short code collision");
                metrics::counter!("shortly_code_collisions_total").increment(1);
                continue;
            }

            let new_mapping = NewUrlMapping {
                original_url: url.clone(),
                short_code: candidate,
            };

            match self.repository.insert(new_mapping).await {
                Ok(mapping) => {
                    info!(code = %mapping.short_code, "Short link created");
                    metrics::counter!("shortly_allocations_total", "outcome" => "created")
                        .increment(1);
                    return Ok(Allocation {
                        mapping,
                        is_new: true,
                    });
                }
                Err(e) if e.is_conflict() => {
                    debug!(attempt, "Insert conflicted, re-checking by URL");
                    if let Some(existing) = self.repository.find_by_url(&url).await? {
                        return Ok(Self::existing(existing));
                    }
                }
                Err(e) => return Err(e),
            }
        }

        warn!(attempts = max_attempts, "Short code allocation exhausted");
        metrics::counter!("shortly_allocations_total", "outcome" => "exhausted").increment(1);

        Err(AppError::allocation_exhausted(
            "Failed to allocate a unique short code",
            json!({ "attempts": max_attempts }),
        ))
    }

    /// Looks up the mapping for a short code.
    ///
    /// The code is checked against the alphabet and the configured length
    /// before the store is queried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code is malformed.
    /// Returns [`AppError::NotFound`] if no mapping has this code.
    pub async fn resolve(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        validate_code(short_code, self.generator.code_length())?;

        self.repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": short_code })))
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            short_code
        )
    }

    /// Returns the underlying repository (used by health checks).
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn existing(mapping: UrlMapping) -> Allocation {
        metrics::counter!("shortly_allocations_total", "outcome" => "existing").increment(1);
        Allocation {
            mapping,
            is_new: false,
        }
    }
}
