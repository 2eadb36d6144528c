//! Documents Domain
//!
//! Text documents stored as embeddings in named collections, with
//! similarity retrieval.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← action and resource HTTP surfaces
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, embedding, get-or-create, update
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼───┐ ┌─▼──────────┐
//! │ Repo │ │  Embedder  │  ← Qdrant / in-memory, hashing / OpenAI / fastembed
//! └──────┘ └────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_documents::{
//!     DocumentService, HashingProvider, InMemoryVectorRepository, handlers,
//! };
//!
//! let embedder = Arc::new(HashingProvider::new(384).unwrap());
//! let service = DocumentService::new(InMemoryVectorRepository::new(), embedder);
//!
//! let router = handlers::router(service, "my_collection");
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::{EmbeddingConfig, EmbeddingProviderKind, StorageBackend, StorageConfig};
pub use embedding::{EmbeddingProvider, HashingProvider, OpenAIProvider, build_provider};
pub use error::{DocumentError, DocumentResult};
pub use memory::InMemoryVectorRepository;
pub use models::{
    CollectionInfo, Document, HnswConfig, Point, ScoredDocument, SearchQuery, VectorConfig,
};
pub use qdrant::{QdrantConfig, QdrantRepository};
pub use repository::VectorRepository;
pub use service::DocumentService;
