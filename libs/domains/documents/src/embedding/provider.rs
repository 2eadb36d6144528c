use async_trait::async_trait;

use crate::error::DocumentResult;

/// Turns text into a fixed-length vector.
///
/// Implementations must return vectors of exactly [`dimension`](Self::dimension)
/// elements for every input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider name for logs and readiness output
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> DocumentResult<Vec<f32>>;

    /// Verifies the provider can serve requests.
    async fn health_check(&self) -> DocumentResult<()> {
        Ok(())
    }
}
