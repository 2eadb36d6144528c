use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Document '{doc_id}' not found in collection '{collection}'")]
    DocumentNotFound { collection: String, doc_id: String },

    #[error("Document '{doc_id}' already exists in collection '{collection}'")]
    DocumentAlreadyExists { collection: String, doc_id: String },

    #[error("Collection '{0}' already exists")]
    CollectionAlreadyExists(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Vector store error: {0}")]
    Storage(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

impl DocumentError {
    pub fn document_not_found(collection: &str, doc_id: &str) -> Self {
        DocumentError::DocumentNotFound {
            collection: collection.to_string(),
            doc_id: doc_id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocumentError::CollectionNotFound(_) | DocumentError::DocumentNotFound { .. }
        )
    }
}

impl From<qdrant_client::QdrantError> for DocumentError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        DocumentError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for DocumentError {
    fn from(err: reqwest::Error) -> Self {
        DocumentError::Embedding(err.to_string())
    }
}

impl From<ConfigError> for DocumentError {
    fn from(err: ConfigError) -> Self {
        DocumentError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for DocumentError {
    fn from(err: validator::ValidationErrors) -> Self {
        DocumentError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Storage(format!("Snapshot serialization failed: {}", err))
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(err: std::io::Error) -> Self {
        DocumentError::Storage(format!("Snapshot I/O failed: {}", err))
    }
}

/// Convert DocumentError to AppError for standardized HTTP error responses
impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            e @ (DocumentError::CollectionNotFound(_) | DocumentError::DocumentNotFound { .. }) => {
                AppError::NotFound(e.to_string())
            }
            e @ (DocumentError::DocumentAlreadyExists { .. }
            | DocumentError::CollectionAlreadyExists(_)) => AppError::Conflict(e.to_string()),
            DocumentError::Validation(msg) => AppError::BadRequest(msg),
            e @ DocumentError::Storage(_) => AppError::Dependency {
                code: ErrorCode::VectorStoreError,
                message: e.to_string(),
            },
            e @ DocumentError::Embedding(_) => AppError::Dependency {
                code: ErrorCode::EmbeddingError,
                message: e.to_string(),
            },
            e @ DocumentError::Config(_) => AppError::Dependency {
                code: ErrorCode::ConfigurationError,
                message: e.to_string(),
            },
            DocumentError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
