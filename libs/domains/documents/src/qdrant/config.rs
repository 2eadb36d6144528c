use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or};

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_QDRANT_TIMEOUT_SECS: u64 = 30;

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout_secs: DEFAULT_QDRANT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_or_default("QDRANT_URL", DEFAULT_QDRANT_URL),
            api_key: env_optional("QDRANT_API_KEY"),
            timeout_secs: env_parse_or("QDRANT_TIMEOUT_SECS", DEFAULT_QDRANT_TIMEOUT_SECS)?,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QDRANT_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = QdrantConfig::new("http://qdrant:6334")
            .with_api_key("secret".to_string())
            .with_timeout(5);
        assert_eq!(config.url, "http://qdrant:6334");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        temp_env::with_var("QDRANT_TIMEOUT_SECS", Some("soon"), || {
            assert!(QdrantConfig::from_env().is_err());
        });
    }
}
