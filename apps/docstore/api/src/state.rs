//! Application state management.
//!
//! The state holds the configuration and the document service, which owns the
//! shared vector store and embedding provider.

use domain_documents::{DocumentService, VectorRepository};

/// Shared application state.
///
/// Cloned for each handler; the service clones only `Arc` pointers.
pub struct AppState<R: VectorRepository> {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub documents: DocumentService<R>,
}

impl<R: VectorRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            documents: self.documents.clone(),
        }
    }
}
