mod hashing;
mod openai;
mod provider;

#[cfg(feature = "fastembed")]
mod fastembed;

pub use hashing::HashingProvider;
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;

#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedProvider;

use std::sync::Arc;

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::error::{DocumentError, DocumentResult};

/// Builds the provider selected by `config`.
pub fn build_provider(config: &EmbeddingConfig) -> DocumentResult<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderKind::Hashing => Arc::new(HashingProvider::new(config.dimension)?),
        EmbeddingProviderKind::OpenAI => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                DocumentError::Config(
                    "OPENAI_API_KEY must be set when EMBEDDING_PROVIDER=openai".to_string(),
                )
            })?;
            let openai = OpenAIConfig::new(api_key, config.openai_model.clone(), config.dimension)
                .with_base_url(config.openai_base_url.clone());
            Arc::new(OpenAIProvider::new(openai))
        }
        #[cfg(feature = "fastembed")]
        EmbeddingProviderKind::FastEmbed => Arc::new(FastEmbedProvider::new()?),
        #[cfg(not(feature = "fastembed"))]
        EmbeddingProviderKind::FastEmbed => {
            return Err(DocumentError::Config(
                "EMBEDDING_PROVIDER=fastembed requires the 'fastembed' feature".to_string(),
            ));
        }
    };

    tracing::info!(
        provider = provider.name(),
        dimension = provider.dimension(),
        "Embedding provider ready"
    );

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_hashing_provider_by_default() {
        let provider = build_provider(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.name(), "hashing");
        assert_eq!(provider.dimension(), 384);
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenAI,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(DocumentError::Config(_))
        ));
    }

    #[test]
    fn test_openai_uses_model_dimension() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenAI,
            openai_api_key: Some("sk-test".to_string()),
            ..EmbeddingConfig::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.dimension(), 1536);
    }

    #[cfg(not(feature = "fastembed"))]
    #[test]
    fn test_fastembed_without_feature_is_a_config_error() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::FastEmbed,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(DocumentError::Config(_))
        ));
    }
}
