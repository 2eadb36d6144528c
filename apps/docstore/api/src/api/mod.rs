use axum::Router;
use domain_documents::{VectorRepository, handlers};

use crate::state::AppState;

pub mod health;

/// Creates the API routes, mounted at the root by `create_router`.
///
/// Returns a stateless Router (the document routers have their state applied).
pub fn routes<R: VectorRepository + 'static>(state: &AppState<R>) -> Router {
    handlers::router(
        state.documents.clone(),
        state.config.documents_collection.as_str(),
    )
}

/// Creates a router with the /ready endpoint that checks the vector store and
/// the embedding provider.
pub fn ready_router<R: VectorRepository + 'static>(state: AppState<R>) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
