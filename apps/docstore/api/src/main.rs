use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_documents::{
    DocumentService, EmbeddingProvider, InMemoryVectorRepository, QdrantRepository,
    StorageBackend, VectorRepository, build_provider,
};
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let embedder = build_provider(&config.embedding)
        .map_err(|e| eyre::eyre!("Embedding provider setup failed: {}", e))?;

    match config.storage.backend {
        StorageBackend::Memory => {
            let repository = match &config.storage.persist_directory {
                Some(dir) => {
                    info!("Using in-memory vector store persisted to {}", dir.display());
                    InMemoryVectorRepository::with_persistence(dir)
                        .await
                        .map_err(|e| eyre::eyre!("Failed to load vector store snapshot: {}", e))?
                }
                None => {
                    info!("Using in-memory vector store");
                    InMemoryVectorRepository::new()
                }
            };
            serve(config, repository, embedder).await
        }
        StorageBackend::Qdrant => {
            info!("Connecting to Qdrant at {}", config.storage.qdrant.url);
            let repository = QdrantRepository::new(config.storage.qdrant.clone())
                .map_err(|e| eyre::eyre!("Qdrant client setup failed: {}", e))?;
            serve(config, repository, embedder).await
        }
    }
}

async fn serve<R: VectorRepository + 'static>(
    config: Config,
    repository: R,
    embedder: Arc<dyn EmbeddingProvider>,
) -> eyre::Result<()> {
    let documents =
        DocumentService::new(repository, embedder).with_hnsw(config.storage.hnsw);

    // The /documents routes need their collection up front
    documents
        .create_collection(&config.documents_collection)
        .await
        .map_err(|e| {
            eyre::eyre!(
                "Failed to prepare collection '{}': {}",
                config.documents_collection,
                e
            )
        })?;

    let state = AppState { config, documents };

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router =
        axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.environment)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the vector store and embedder
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        collection = %state.config.documents_collection,
        "Starting docstore API with graceful shutdown"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: persisting vector store");
        match state.documents.persist().await {
            Ok(()) => info!("Vector store persisted"),
            Err(e) => tracing::error!("Error persisting vector store: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Docstore API shutdown complete");
    Ok(())
}
