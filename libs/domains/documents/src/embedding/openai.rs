use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::DEFAULT_OPENAI_BASE_URL;
use crate::error::{DocumentError, DocumentResult};

/// OpenAI embedding provider configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
}

impl OpenAIConfig {
    /// Uses the model's native dimension when it is known, `fallback_dimension` otherwise.
    pub fn new(api_key: String, model: impl Into<String>, fallback_dimension: usize) -> Self {
        let model = model.into();
        let dimension = known_dimension(&model).unwrap_or(fallback_dimension);
        Self {
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model,
            dimension,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

fn known_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

/// OpenAI embeddings provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> DocumentResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: vec![text],
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocumentError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let embedding = response
            .json::<EmbeddingResponse>()
            .await?
            .data
            .into_iter()
            .next()
            .ok_or_else(|| DocumentError::Embedding("No embedding returned".to_string()))?
            .embedding;

        if embedding.len() != self.config.dimension {
            return Err(DocumentError::Embedding(format!(
                "Model '{}' returned {} dimensions, expected {}",
                self.config.model,
                embedding.len(),
                self.config.dimension
            )));
        }

        Ok(embedding)
    }

    async fn health_check(&self) -> DocumentResult<()> {
        let response = self
            .client
            .get(format!("{}/models/{}", self.config.base_url, self.config.model))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DocumentError::Embedding(format!(
                "OpenAI model '{}' unavailable ({})",
                self.config.model,
                response.status()
            )))
        }
    }
}
