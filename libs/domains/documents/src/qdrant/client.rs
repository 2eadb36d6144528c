use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, DeletePointsBuilder, Distance, GetPointsBuilder, PointId,
    PointStruct, PointsIdsList, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};

use super::QdrantConfig;
use crate::error::{DocumentError, DocumentResult};
use crate::models::{
    CollectionInfo, Document, Point, ScoredDocument, SearchQuery, VectorConfig, point_id,
};
use crate::repository::VectorRepository;

const DOC_ID_KEY: &str = "doc_id";
const TEXT_KEY: &str = "text";

/// Qdrant-backed implementation of VectorRepository
pub struct QdrantRepository {
    client: Qdrant,
}

impl QdrantRepository {
    pub fn new(config: QdrantConfig) -> DocumentResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| DocumentError::Storage(format!("Failed to build client: {}", e)))?;

        tracing::info!(url = %config.url, "Qdrant client configured");
        Ok(Self { client })
    }

    fn to_point_id(doc_id: &str) -> PointId {
        PointId::from(point_id(doc_id).to_string())
    }

    fn to_payload(doc_id: &str, text: &str) -> HashMap<String, QdrantValue> {
        HashMap::from([
            (DOC_ID_KEY.to_string(), QdrantValue::from(doc_id.to_string())),
            (TEXT_KEY.to_string(), QdrantValue::from(text.to_string())),
        ])
    }

    fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> DocumentResult<String> {
        match payload.get(key).and_then(|v| v.kind.as_ref()) {
            Some(qdrant::value::Kind::StringValue(s)) => Ok(s.clone()),
            _ => Err(DocumentError::Storage(format!(
                "Point payload is missing '{}'",
                key
            ))),
        }
    }

    fn vector_size(info: &qdrant::CollectionInfo) -> usize {
        let params = info
            .config
            .as_ref()
            .and_then(|c| c.params.as_ref())
            .and_then(|p| p.vectors_config.as_ref())
            .and_then(|vc| vc.config.as_ref());

        match params {
            Some(qdrant::vectors_config::Config::Params(p)) => p.size as usize,
            Some(qdrant::vectors_config::Config::ParamsMap(map)) => map
                .map
                .values()
                .next()
                .map(|p| p.size as usize)
                .unwrap_or_default(),
            None => 0,
        }
    }
}

#[async_trait]
impl VectorRepository for QdrantRepository {
    async fn create_collection(
        &self,
        name: &str,
        config: &VectorConfig,
    ) -> DocumentResult<CollectionInfo> {
        if self.client.collection_exists(name).await? {
            return Err(DocumentError::CollectionAlreadyExists(name.to_string()));
        }

        let mut builder = CreateCollectionBuilder::new(name).vectors_config(
            VectorParamsBuilder::new(config.dimension as u64, Distance::Cosine),
        );

        if let Some(hnsw) = &config.hnsw {
            let hnsw_config = qdrant::HnswConfigDiff {
                m: hnsw.m.map(u64::from),
                ef_construct: hnsw.ef_construct.map(u64::from),
                ..Default::default()
            };
            builder = builder.hnsw_config(hnsw_config);
        }

        self.client.create_collection(builder).await?;
        tracing::info!(
            collection = name,
            dimension = config.dimension,
            "Created Qdrant collection"
        );

        Ok(CollectionInfo {
            name: name.to_string(),
            dimension: config.dimension,
            points_count: 0,
        })
    }

    async fn delete_collection(&self, name: &str) -> DocumentResult<bool> {
        if !self.client.collection_exists(name).await? {
            return Ok(false);
        }
        self.client.delete_collection(name).await?;
        tracing::info!(collection = name, "Deleted Qdrant collection");
        Ok(true)
    }

    async fn get_collection(&self, name: &str) -> DocumentResult<Option<CollectionInfo>> {
        if !self.client.collection_exists(name).await? {
            return Ok(None);
        }

        let info = self
            .client
            .collection_info(name)
            .await?
            .result
            .ok_or_else(|| DocumentError::Storage("Collection info missing result".to_string()))?;

        Ok(Some(CollectionInfo {
            name: name.to_string(),
            dimension: Self::vector_size(&info),
            points_count: info.points_count.unwrap_or_default(),
        }))
    }

    async fn upsert(&self, collection: &str, point: Point) -> DocumentResult<()> {
        let Point {
            id,
            doc_id,
            text,
            vector,
        } = point;

        let qdrant_point = PointStruct::new(
            PointId::from(id.to_string()),
            vector,
            Self::to_payload(&doc_id, &text),
        );
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![qdrant_point]).wait(true))
            .await?;

        tracing::debug!(collection, doc_id = %doc_id, "Upserted point");
        Ok(())
    }

    async fn get(&self, collection: &str, doc_id: &str) -> DocumentResult<Option<Document>> {
        let builder = GetPointsBuilder::new(collection, vec![Self::to_point_id(doc_id)])
            .with_payload(true)
            .with_vectors(false);

        let response = self.client.get_points(builder).await?;

        response
            .result
            .into_iter()
            .next()
            .map(|point| {
                Ok(Document {
                    doc_id: Self::payload_string(&point.payload, DOC_ID_KEY)?,
                    text: Self::payload_string(&point.payload, TEXT_KEY)?,
                })
            })
            .transpose()
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> DocumentResult<()> {
        let builder = DeletePointsBuilder::new(collection)
            .points(PointsIdsList {
                ids: vec![Self::to_point_id(doc_id)],
            })
            .wait(true);

        self.client.delete_points(builder).await?;
        tracing::debug!(collection, doc_id, "Deleted point");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: SearchQuery,
    ) -> DocumentResult<Vec<ScoredDocument>> {
        let builder = SearchPointsBuilder::new(collection, query.vector, query.limit as u64)
            .with_payload(true);

        let results = self.client.search_points(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredDocument {
                    doc_id: Self::payload_string(&point.payload, DOC_ID_KEY)?,
                    text: Self::payload_string(&point.payload, TEXT_KEY)?,
                    // Cosine collections already report 1 - cosine distance
                    score: point.score,
                })
            })
            .collect()
    }

    async fn health_check(&self) -> DocumentResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_round_trips_doc_id_and_text() {
        let payload = QdrantRepository::to_payload("doc1", "Hello");
        assert_eq!(
            QdrantRepository::payload_string(&payload, DOC_ID_KEY).unwrap(),
            "doc1"
        );
        assert_eq!(
            QdrantRepository::payload_string(&payload, TEXT_KEY).unwrap(),
            "Hello"
        );
    }

    #[test]
    fn test_missing_payload_field_is_storage_error() {
        let payload = HashMap::new();
        assert!(matches!(
            QdrantRepository::payload_string(&payload, TEXT_KEY),
            Err(DocumentError::Storage(_))
        ));
    }

    #[test]
    fn test_point_id_is_uuid_of_doc_id() {
        let expected = PointId::from(point_id("doc1").to_string());
        assert_eq!(QdrantRepository::to_point_id("doc1"), expected);
    }
}
