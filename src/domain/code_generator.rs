//! Short code generator contract.

/// Produces candidate short codes.
///
/// Generators are pure: they never consult storage. Uniqueness is enforced by
/// the allocation protocol in
/// [`crate::application::services::LinkService`], which treats an existing
/// code as a collision and asks for another candidate.
///
/// # Implementations
///
/// - [`crate::utils::code_generator::RandomCodeGenerator`] - uniform random codes
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a new candidate code.
    fn generate(&self) -> String;

    /// Length of every code this generator produces.
    fn code_length(&self) -> usize;
}
