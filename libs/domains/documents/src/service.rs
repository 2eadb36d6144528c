use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::embedding::EmbeddingProvider;
use crate::error::{DocumentError, DocumentResult};
use crate::models::{
    CollectionInfo, Document, HnswConfig, Point, ScoredDocument, SearchQuery, VectorConfig,
    check_collection_name, check_doc_id, check_text, check_top_n,
};
use crate::repository::VectorRepository;

/// Document CRUD and similarity search over one vector store and one embedder.
///
/// Text is embedded on every insert, update and query. Updates delete the old
/// point and insert a new one under the same id.
pub struct DocumentService<R: VectorRepository> {
    repository: Arc<R>,
    embedder: Arc<dyn EmbeddingProvider>,
    hnsw: Option<HnswConfig>,
}

impl<R: VectorRepository> Clone for DocumentService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            embedder: Arc::clone(&self.embedder),
            hnsw: self.hnsw,
        }
    }
}

impl<R: VectorRepository> DocumentService<R> {
    pub fn new(repository: R, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository: Arc::new(repository),
            embedder,
            hnsw: None,
        }
    }

    /// HNSW tuning for collections created by this service
    pub fn with_hnsw(mut self, hnsw: Option<HnswConfig>) -> Self {
        self.hnsw = hnsw;
        self
    }

    fn vector_config(&self) -> VectorConfig {
        VectorConfig::new(self.embedder.dimension()).with_hnsw(self.hnsw)
    }

    // ===== Collection Management =====

    /// Get-or-create. An existing collection is reused when its dimension
    /// matches the embedder.
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn create_collection(&self, name: &str) -> DocumentResult<CollectionInfo> {
        check_collection_name(name)?;

        if let Some(existing) = self.repository.get_collection(name).await? {
            tracing::debug!("Collection already exists, reusing");
            return self.check_compatible(existing);
        }

        match self
            .repository
            .create_collection(name, &self.vector_config())
            .await
        {
            Ok(info) => Ok(info),
            Err(create_err) => match self.repository.get_collection(name).await? {
                // Created concurrently by another request
                Some(existing) => self.check_compatible(existing),
                None => Err(create_err),
            },
        }
    }

    fn check_compatible(&self, info: CollectionInfo) -> DocumentResult<CollectionInfo> {
        let expected = self.embedder.dimension();
        if info.dimension != expected {
            return Err(DocumentError::Config(format!(
                "Collection '{}' stores {}-dimensional vectors but the '{}' embedder produces {}",
                info.name,
                info.dimension,
                self.embedder.name(),
                expected
            )));
        }
        Ok(info)
    }

    /// Deletes a collection; returns whether it existed.
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn delete_collection(&self, name: &str) -> DocumentResult<bool> {
        check_collection_name(name)?;
        let existed = self.repository.delete_collection(name).await?;
        if !existed {
            tracing::info!("Collection does not exist, skipping delete");
        }
        Ok(existed)
    }

    async fn require_collection(&self, name: &str) -> DocumentResult<CollectionInfo> {
        check_collection_name(name)?;
        self.repository
            .get_collection(name)
            .await?
            .ok_or_else(|| DocumentError::CollectionNotFound(name.to_string()))
    }

    // ===== Document Operations =====

    /// Inserts a document, creating the collection if needed.
    ///
    /// A UUID v4 is generated when `doc_id` is `None`. Returns the id.
    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn insert_document(
        &self,
        collection: &str,
        doc_id: Option<String>,
        text: &str,
    ) -> DocumentResult<String> {
        let doc_id = doc_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        check_doc_id(&doc_id)?;
        check_text("text", text)?;

        self.create_collection(collection).await?;

        if self.repository.get(collection, &doc_id).await?.is_some() {
            return Err(DocumentError::DocumentAlreadyExists {
                collection: collection.to_string(),
                doc_id,
            });
        }

        let vector = self.embed(text).await?;
        self.repository
            .upsert(collection, Point::new(doc_id.as_str(), text, vector))
            .await?;

        tracing::info!(doc_id = %doc_id, "Inserted document");
        Ok(doc_id)
    }

    /// Replaces the text of an existing document.
    #[instrument(skip_all, fields(collection = %collection, doc_id = %doc_id))]
    pub async fn update_document(
        &self,
        collection: &str,
        doc_id: &str,
        text: &str,
    ) -> DocumentResult<()> {
        check_doc_id(doc_id)?;
        check_text("text", text)?;
        self.require_collection(collection).await?;

        if self.repository.get(collection, doc_id).await?.is_none() {
            return Err(DocumentError::document_not_found(collection, doc_id));
        }

        // An embedding failure must leave the old document untouched
        let vector = self.embed(text).await?;
        self.repository.delete(collection, doc_id).await?;
        self.repository
            .upsert(collection, Point::new(doc_id, text, vector))
            .await?;

        tracing::info!("Updated document");
        Ok(())
    }

    #[instrument(skip_all, fields(collection = %collection, doc_id = %doc_id))]
    pub async fn delete_document(&self, collection: &str, doc_id: &str) -> DocumentResult<()> {
        check_doc_id(doc_id)?;
        self.require_collection(collection).await?;

        if self.repository.get(collection, doc_id).await?.is_none() {
            return Err(DocumentError::document_not_found(collection, doc_id));
        }

        self.repository.delete(collection, doc_id).await?;
        tracing::info!("Deleted document");
        Ok(())
    }

    #[instrument(skip_all, fields(collection = %collection, doc_id = %doc_id))]
    pub async fn get_document(&self, collection: &str, doc_id: &str) -> DocumentResult<Document> {
        check_doc_id(doc_id)?;
        self.require_collection(collection).await?;

        self.repository
            .get(collection, doc_id)
            .await?
            .ok_or_else(|| DocumentError::document_not_found(collection, doc_id))
    }

    /// The `top_n` documents most similar to `query_text`, best first.
    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn retrieve(
        &self,
        collection: &str,
        query_text: &str,
        top_n: u32,
    ) -> DocumentResult<Vec<ScoredDocument>> {
        check_text("query_text", query_text)?;
        check_top_n(top_n)?;
        self.require_collection(collection).await?;

        let vector = self.embed(query_text).await?;
        let results = self
            .repository
            .search(collection, SearchQuery::new(vector, top_n as usize))
            .await?;

        tracing::debug!(matches = results.len(), "Retrieved documents");
        Ok(results)
    }

    async fn embed(&self, text: &str) -> DocumentResult<Vec<f32>> {
        let vector = self.embedder.embed(text).await?;
        if vector.len() != self.embedder.dimension() {
            return Err(DocumentError::Embedding(format!(
                "'{}' embedder returned {} dimensions, expected {}",
                self.embedder.name(),
                vector.len(),
                self.embedder.dimension()
            )));
        }
        Ok(vector)
    }

    // ===== Lifecycle =====

    pub async fn check_vector_store(&self) -> DocumentResult<()> {
        self.repository.health_check().await
    }

    pub async fn check_embedder(&self) -> DocumentResult<()> {
        self.embedder.health_check().await
    }

    /// Flushes the vector store, for shutdown.
    pub async fn persist(&self) -> DocumentResult<()> {
        self.repository.persist().await
    }
}
