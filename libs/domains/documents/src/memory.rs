//! In-process vector store with brute-force cosine ranking.
//!
//! With a snapshot directory the whole store is written to
//! `<dir>/collections.json` after every mutation and reloaded on startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DocumentError, DocumentResult};
use crate::models::{
    CollectionInfo, Document, Point, ScoredDocument, SearchQuery, VectorConfig, point_id,
};
use crate::repository::VectorRepository;

pub const SNAPSHOT_FILE: &str = "collections.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemoryCollection {
    config: VectorConfig,
    points: HashMap<Uuid, Point>,
}

impl MemoryCollection {
    fn info(&self, name: &str) -> CollectionInfo {
        CollectionInfo {
            name: name.to_string(),
            dimension: self.config.dimension,
            points_count: self.points.len() as u64,
        }
    }
}

type Collections = HashMap<String, MemoryCollection>;

#[derive(Default)]
pub struct InMemoryVectorRepository {
    collections: RwLock<Collections>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryVectorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by `<directory>/collections.json`, loading it if present.
    pub async fn with_persistence(directory: impl AsRef<Path>) -> DocumentResult<Self> {
        let directory = directory.as_ref();
        tokio::fs::create_dir_all(directory).await?;
        let path = directory.join(SNAPSHOT_FILE);

        let collections: Collections = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            collections = collections.len(),
            "Loaded vector store snapshot"
        );

        Ok(Self {
            collections: RwLock::new(collections),
            snapshot_path: Some(path),
        })
    }

    async fn write_snapshot(&self, collections: &Collections) -> DocumentResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec(collections)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::debug!(path = %path.display(), "Wrote vector store snapshot");
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn check_dimension(expected: usize, actual: usize) -> DocumentResult<()> {
    if expected != actual {
        return Err(DocumentError::Storage(format!(
            "Vector dimension mismatch: expected {}, got {}",
            expected, actual
        )));
    }
    Ok(())
}

#[async_trait]
impl VectorRepository for InMemoryVectorRepository {
    async fn create_collection(
        &self,
        name: &str,
        config: &VectorConfig,
    ) -> DocumentResult<CollectionInfo> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(DocumentError::CollectionAlreadyExists(name.to_string()));
        }

        let collection = MemoryCollection {
            config: *config,
            points: HashMap::new(),
        };
        let info = collection.info(name);
        collections.insert(name.to_string(), collection);
        if let Err(e) = self.write_snapshot(&collections).await {
            collections.remove(name);
            return Err(e);
        }

        tracing::info!(collection = name, dimension = config.dimension, "Created collection");
        Ok(info)
    }

    async fn delete_collection(&self, name: &str) -> DocumentResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(removed) = collections.remove(name) else {
            return Ok(false);
        };
        if let Err(e) = self.write_snapshot(&collections).await {
            collections.insert(name.to_string(), removed);
            return Err(e);
        }

        tracing::info!(collection = name, "Deleted collection");
        Ok(true)
    }

    async fn get_collection(&self, name: &str) -> DocumentResult<Option<CollectionInfo>> {
        let collections = self.collections.read().await;
        Ok(collections.get(name).map(|c| c.info(name)))
    }

    async fn upsert(&self, collection: &str, point: Point) -> DocumentResult<()> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| DocumentError::CollectionNotFound(collection.to_string()))?;
        check_dimension(target.config.dimension, point.vector.len())?;

        tracing::debug!(collection, doc_id = %point.doc_id, "Upserting point");
        let id = point.id;
        let previous = target.points.insert(id, point);

        if let Err(e) = self.write_snapshot(&collections).await {
            // Roll back so memory matches the last snapshot on disk
            if let Some(points) = collections.get_mut(collection).map(|c| &mut c.points) {
                match previous {
                    Some(old) => points.insert(id, old),
                    None => points.remove(&id),
                };
            }
            return Err(e);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, doc_id: &str) -> DocumentResult<Option<Document>> {
        let collections = self.collections.read().await;
        let target = collections
            .get(collection)
            .ok_or_else(|| DocumentError::CollectionNotFound(collection.to_string()))?;

        Ok(target.points.get(&point_id(doc_id)).map(|p| Document {
            doc_id: p.doc_id.clone(),
            text: p.text.clone(),
        }))
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> DocumentResult<()> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| DocumentError::CollectionNotFound(collection.to_string()))?;

        let id = point_id(doc_id);
        let Some(removed) = target.points.remove(&id) else {
            return Ok(());
        };

        if let Err(e) = self.write_snapshot(&collections).await {
            if let Some(c) = collections.get_mut(collection) {
                c.points.insert(id, removed);
            }
            return Err(e);
        }

        tracing::debug!(collection, doc_id, "Deleted point");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: SearchQuery,
    ) -> DocumentResult<Vec<ScoredDocument>> {
        let collections = self.collections.read().await;
        let target = collections
            .get(collection)
            .ok_or_else(|| DocumentError::CollectionNotFound(collection.to_string()))?;
        check_dimension(target.config.dimension, query.vector.len())?;

        let mut scored: Vec<ScoredDocument> = target
            .points
            .values()
            .map(|p| ScoredDocument {
                doc_id: p.doc_id.clone(),
                text: p.text.clone(),
                score: cosine_similarity(&query.vector, &p.vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        scored.truncate(query.limit);

        Ok(scored)
    }

    async fn health_check(&self) -> DocumentResult<()> {
        Ok(())
    }

    async fn persist(&self) -> DocumentResult<()> {
        let collections = self.collections.read().await;
        self.write_snapshot(&collections).await
    }
}
