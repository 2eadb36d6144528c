use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use domain_documents::{EmbeddingConfig, StorageConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Collection served by the `/documents` routes
pub const DEFAULT_DOCUMENTS_COLLECTION: &str = "my_collection";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub documents_collection: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let storage = StorageConfig::from_env()?; // Defaults to the in-memory backend
        let embedding = EmbeddingConfig::from_env()?; // Defaults to the hashing provider

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            storage,
            embedding,
            documents_collection: env_or_default(
                "DOCUMENTS_COLLECTION",
                DEFAULT_DOCUMENTS_COLLECTION,
            ),
        })
    }
}
