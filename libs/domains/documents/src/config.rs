//! Storage and embedding configuration loaded from the environment.

use core_config::{
    ConfigError, FromEnv, env_optional, env_or_default, env_parse_optional, env_parse_or,
};
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::HnswConfig;
use crate::qdrant::QdrantConfig;

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Vector engine selected with `STORAGE_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    Qdrant,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "qdrant" => Ok(StorageBackend::Qdrant),
            other => Err(format!(
                "unknown storage backend '{}', expected 'memory' or 'qdrant'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Snapshot directory for the memory backend
    pub persist_directory: Option<PathBuf>,
    pub qdrant: QdrantConfig,
    pub hnsw: Option<HnswConfig>,
}

impl FromEnv for StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_parse_or("STORAGE_BACKEND", StorageBackend::Memory)?;
        let persist_directory = env_optional("PERSIST_DIRECTORY").map(PathBuf::from);

        let hnsw = HnswConfig {
            m: env_parse_optional("HNSW_M")?,
            ef_construct: env_parse_optional("HNSW_EF_CONSTRUCT")?,
        };

        Ok(Self {
            backend,
            persist_directory,
            qdrant: QdrantConfig::from_env()?,
            hnsw: (!hnsw.is_empty()).then_some(hnsw),
        })
    }
}

/// Embedding provider selected with `EMBEDDING_PROVIDER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingProviderKind {
    #[default]
    Hashing,
    OpenAI,
    FastEmbed,
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hashing" | "hash" => Ok(EmbeddingProviderKind::Hashing),
            "openai" => Ok(EmbeddingProviderKind::OpenAI),
            "fastembed" => Ok(EmbeddingProviderKind::FastEmbed),
            other => Err(format!(
                "unknown embedding provider '{}', expected 'hashing', 'openai' or 'fastembed'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    /// Vector size of the hashing provider, and of unknown OpenAI models
    pub dimension: usize,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Hashing,
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl FromEnv for EmbeddingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let dimension = env_parse_or("EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION)?;
        if dimension == 0 {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_DIMENSION".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            provider: env_parse_or("EMBEDDING_PROVIDER", EmbeddingProviderKind::Hashing)?,
            dimension,
            openai_api_key: env_optional("OPENAI_API_KEY"),
            openai_base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_OPENAI_MODEL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORAGE_VARS: [&str; 7] = [
        "STORAGE_BACKEND",
        "PERSIST_DIRECTORY",
        "HNSW_M",
        "HNSW_EF_CONSTRUCT",
        "QDRANT_URL",
        "QDRANT_API_KEY",
        "QDRANT_TIMEOUT_SECS",
    ];

    #[test]
    fn test_storage_defaults_to_memory() {
        temp_env::with_vars_unset(STORAGE_VARS, || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.backend, StorageBackend::Memory);
            assert!(config.persist_directory.is_none());
            assert!(config.hnsw.is_none());
            assert_eq!(config.qdrant.url, "http://localhost:6334");
        });
    }

    #[test]
    fn test_storage_reads_qdrant_and_hnsw() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("Qdrant")),
                ("PERSIST_DIRECTORY", None),
                ("HNSW_M", Some("32")),
                ("HNSW_EF_CONSTRUCT", None),
                ("QDRANT_URL", Some("http://qdrant:6334")),
                ("QDRANT_API_KEY", None),
                ("QDRANT_TIMEOUT_SECS", None),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::Qdrant);
                assert_eq!(config.qdrant.url, "http://qdrant:6334");
                assert_eq!(
                    config.hnsw,
                    Some(HnswConfig {
                        m: Some(32),
                        ef_construct: None
                    })
                );
            },
        );
    }

    #[test]
    fn test_storage_rejects_unknown_backend() {
        temp_env::with_var("STORAGE_BACKEND", Some("chroma"), || {
            assert!(matches!(
                StorageConfig::from_env(),
                Err(ConfigError::ParseError { .. })
            ));
        });
    }

    #[test]
    fn test_embedding_defaults() {
        temp_env::with_vars_unset(
            [
                "EMBEDDING_PROVIDER",
                "EMBEDDING_DIMENSION",
                "OPENAI_API_KEY",
                "OPENAI_BASE_URL",
                "OPENAI_EMBEDDING_MODEL",
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.provider, EmbeddingProviderKind::Hashing);
                assert_eq!(config.dimension, DEFAULT_EMBEDDING_DIMENSION);
                assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
                assert!(config.openai_api_key.is_none());
            },
        );
    }

    #[test]
    fn test_embedding_rejects_zero_dimension() {
        temp_env::with_var("EMBEDDING_DIMENSION", Some("0"), || {
            assert!(EmbeddingConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_embedding_provider_names() {
        assert_eq!(
            "OpenAI".parse::<EmbeddingProviderKind>(),
            Ok(EmbeddingProviderKind::OpenAI)
        );
        assert_eq!(
            "fastembed".parse::<EmbeddingProviderKind>(),
            Ok(EmbeddingProviderKind::FastEmbed)
        );
        assert!("bert".parse::<EmbeddingProviderKind>().is_err());
    }
}
