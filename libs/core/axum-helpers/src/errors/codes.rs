//! Type-safe error codes for API responses.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer for
//! logs and metrics, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1004);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes.
///
/// Ranges:
/// - 1000-1999: client errors
/// - 6000-6999: vector store and embedding dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request validation failed
    ValidationError,
    /// Request body could not be extracted as JSON
    JsonExtraction,
    /// Requested resource was not found
    NotFound,
    /// An unexpected internal server error occurred
    InternalError,
    /// Request conflicts with current resource state
    Conflict,
    /// Malformed request that is not a field validation failure
    BadRequest,
    /// Route exists but not for this HTTP method
    MethodNotAllowed,

    /// The vector store rejected or failed an operation
    VectorStoreError,
    /// The embedding provider failed to produce a vector
    EmbeddingError,
    /// The service is misconfigured for the requested operation
    ConfigurationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::VectorStoreError => "VECTOR_STORE_ERROR",
            Self::EmbeddingError => "EMBEDDING_ERROR",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
        }
    }

    /// Integer code for structured logs and metrics.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Conflict => 1008,
            Self::BadRequest => 1012,
            Self::MethodNotAllowed => 1013,

            Self::VectorStoreError => 6001,
            Self::EmbeddingError => 6002,
            Self::ConfigurationError => 6003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::Conflict => "Resource already exists",
            Self::BadRequest => "Bad request",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::VectorStoreError => "Vector store operation failed",
            Self::EmbeddingError => "Embedding generation failed",
            Self::ConfigurationError => "Service configuration error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
