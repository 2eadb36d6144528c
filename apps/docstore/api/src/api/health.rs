//! Readiness checks against the vector store and the embedding provider.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_documents::VectorRepository;

/// Readiness check endpoint.
///
/// Runs both checks concurrently through `run_health_checks`.
pub async fn ready_handler<R: VectorRepository>(State(state): State<AppState<R>>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "vector_store",
            Box::pin(async {
                state
                    .documents
                    .check_vector_store()
                    .await
                    .map_err(|e| format!("Vector store check failed: {}", e))
            }),
        ),
        (
            "embedder",
            Box::pin(async {
                state
                    .documents
                    .check_embedder()
                    .await
                    .map_err(|e| format!("Embedder check failed: {}", e))
            }),
        ),
    ];

    run_health_checks(checks).await.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain_documents::{DocumentService, HashingProvider, InMemoryVectorRepository};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ready_reports_each_check() {
        let config = temp_env::with_vars_unset(["STORAGE_BACKEND", "EMBEDDING_PROVIDER"], || {
            Config::from_env().unwrap()
        });
        let embedder = Arc::new(HashingProvider::new(384).unwrap());
        let state = AppState {
            config,
            documents: DocumentService::new(InMemoryVectorRepository::new(), embedder),
        };

        let response = crate::api::ready_router(state)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["vector_store"], "connected");
        assert_eq!(body["embedder"], "connected");
    }
}
