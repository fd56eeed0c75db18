//! Service provider interface

use std::sync::Arc;

use crate::error::DiResult;
use crate::service::Service;

/// The container-interface seam: anything that can hand out services by
/// identifier. Factories and container-aware services can depend on this
/// trait instead of the concrete container.
pub trait ServiceProvider: Send + Sync {
    /// Resolve a service by identifier
    fn get_service(&self, id: &str) -> DiResult<Arc<dyn Service>>;

    /// Check whether an identifier is resolvable without constructing it
    fn has_service(&self, id: &str) -> bool;
}
