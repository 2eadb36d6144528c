//! Local all-MiniLM-L6-v2 embeddings (feature `fastembed`).

use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::EmbeddingProvider;
use crate::error::{DocumentError, DocumentResult};

pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedProvider {
    pub const DIMENSION: usize = 384;

    /// Loads the model, downloading it on first use.
    pub fn new() -> DocumentResult<Self> {
        tracing::info!(model = "all-MiniLM-L6-v2", "Loading embedding model");
        let start = Instant::now();

        let options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| DocumentError::Embedding(format!("Failed to load model: {}", e)))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Embedding model loaded"
        );

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &'static str {
        "fastembed"
    }

    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    async fn embed(&self, text: &str) -> DocumentResult<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        // ONNX inference is CPU-bound
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| DocumentError::Internal("Embedding model lock poisoned".to_string()))?;
            model
                .embed(vec![text], None)
                .map_err(|e| DocumentError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| DocumentError::Internal(format!("Embedding task failed: {}", e)))??;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| DocumentError::Embedding("No embedding returned".to_string()))
    }
}
