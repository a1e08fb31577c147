//! Shared application state injected into all handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::access_event::AccessEvent;
use crate::infrastructure::persistence::SqliteMappingRepository;
use crate::utils::code_generator::RandomCodeGenerator;

/// Link service wired to the production store and generator.
pub type AppLinkService = LinkService<SqliteMappingRepository, RandomCodeGenerator>;

/// State shared by every request.
///
/// Cheap to clone: services are behind `Arc` and the sender is a handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    /// Queue feeding [`crate::domain::access_worker::run_access_worker`].
    pub access_sender: mpsc::Sender<AccessEvent>,
    /// Upper bound on URLs per batch request.
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(
        link_service: Arc<AppLinkService>,
        access_sender: mpsc::Sender<AccessEvent>,
        max_batch_size: usize,
    ) -> Self {
        Self {
            link_service,
            access_sender,
            max_batch_size,
        }
    }
}
