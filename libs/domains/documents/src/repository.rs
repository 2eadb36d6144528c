use async_trait::async_trait;

use crate::error::DocumentResult;
use crate::models::{CollectionInfo, Document, Point, ScoredDocument, SearchQuery, VectorConfig};

/// Repository trait for vector storage operations
///
/// This trait abstracts the underlying vector engine. Documents are addressed by
/// collection name and caller-visible document id; similarity is cosine and
/// scores are `1 - cosine distance`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    // ===== Collection Management =====

    /// Create a collection. Fails with `CollectionAlreadyExists` if it exists.
    async fn create_collection(
        &self,
        name: &str,
        config: &VectorConfig,
    ) -> DocumentResult<CollectionInfo>;

    /// Delete a collection, returning whether it existed
    async fn delete_collection(&self, name: &str) -> DocumentResult<bool>;

    async fn get_collection(&self, name: &str) -> DocumentResult<Option<CollectionInfo>>;

    // ===== Document Operations =====

    /// Insert or replace the point with `point.id`
    async fn upsert(&self, collection: &str, point: Point) -> DocumentResult<()>;

    async fn get(&self, collection: &str, doc_id: &str) -> DocumentResult<Option<Document>>;

    /// Remove a document; absent ids are not an error
    async fn delete(&self, collection: &str, doc_id: &str) -> DocumentResult<()>;

    /// Nearest neighbours, best first
    async fn search(
        &self,
        collection: &str,
        query: SearchQuery,
    ) -> DocumentResult<Vec<ScoredDocument>>;

    // ===== Lifecycle =====

    async fn health_check(&self) -> DocumentResult<()>;

    /// Flush state to durable storage, for engines that buffer it
    async fn persist(&self) -> DocumentResult<()> {
        Ok(())
    }
}
