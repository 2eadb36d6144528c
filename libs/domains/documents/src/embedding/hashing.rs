//! Deterministic offline embeddings.
//!
//! Each token is hashed with SHA-256 into one signed bucket of the output
//! vector (feature hashing), and the result is L2-normalised. Texts sharing
//! tokens get a positive cosine similarity; texts without common tokens score 0.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::EmbeddingProvider;
use crate::error::{DocumentError, DocumentResult};

pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> DocumentResult<Self> {
        if dimension == 0 {
            return Err(DocumentError::Config(
                "Embedding dimension must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            let index = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

/// Lowercased alphanumeric runs; the whole trimmed text when there are none.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if !tokens.is_empty() {
        return tokens;
    }

    let trimmed = lowered.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn name(&self) -> &'static str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DocumentResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }
}
