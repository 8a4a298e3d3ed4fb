//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CAMPLY_*)
//! 2. TOML config file (if CAMPLY_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Schema tag written next to every cache entry by this build.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

/// Default time-to-live of a cache entry (24 hours).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CAMPLY_*)
/// 2. TOML config file (if CAMPLY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite key-value store.
    ///
    /// Set via CAMPLY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Schema tag for cached records. Bump on format changes to invalidate
    /// everything written by older builds.
    ///
    /// Set via CAMPLY_SCHEMA_VERSION environment variable.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Default cache TTL in seconds.
    ///
    /// Set via CAMPLY_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per content type TTL overrides in seconds, keyed by content type
    /// (e.g. `campus-news = 21600`).
    #[serde(default)]
    pub content_ttl_secs: HashMap<String, u64>,

    /// Byte budget of the key-value store.
    ///
    /// Set via CAMPLY_STORAGE_QUOTA_BYTES environment variable.
    #[serde(default = "default_storage_quota_bytes")]
    pub storage_quota_bytes: usize,

    /// API key for the chat assistant.
    ///
    /// Set via CAMPLY_ASSISTANT_API_KEY environment variable.
    /// Required only when campus content is requested.
    #[serde(default)]
    pub assistant_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible assistant endpoint.
    ///
    /// Set via CAMPLY_ASSISTANT_BASE_URL environment variable.
    #[serde(default = "default_assistant_base_url")]
    pub assistant_base_url: String,

    /// Model name sent with every assistant request.
    ///
    /// Set via CAMPLY_ASSISTANT_MODEL environment variable.
    #[serde(default = "default_assistant_model")]
    pub assistant_model: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via CAMPLY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via CAMPLY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./camply-cache.sqlite")
}

fn default_schema_version() -> String {
    DEFAULT_SCHEMA_VERSION.into()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_storage_quota_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_assistant_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}

fn default_assistant_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    "camply/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            schema_version: default_schema_version(),
            cache_ttl_secs: default_cache_ttl_secs(),
            content_ttl_secs: HashMap::new(),
            storage_quota_bytes: default_storage_quota_bytes(),
            assistant_api_key: None,
            assistant_base_url: default_assistant_base_url(),
            assistant_model: default_assistant_model(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Default cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CAMPLY_`
    /// 2. TOML file from `CAMPLY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CAMPLY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CAMPLY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the assistant API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_assistant_api_key(&self) -> Result<&str, ConfigError> {
        self.assistant_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "assistant_api_key".into(),
                hint: "Set CAMPLY_ASSISTANT_API_KEY environment variable".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./camply-cache.sqlite"));
        assert_eq!(config.schema_version, DEFAULT_SCHEMA_VERSION);
        assert_eq!(config.cache_ttl_secs, 86_400);
        assert!(config.content_ttl_secs.is_empty());
        assert_eq!(config.storage_quota_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.user_agent, "camply/0.1");
        assert!(config.assistant_api_key.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_require_assistant_api_key_missing() {
        let config = AppConfig::default();
        assert!(matches!(config.require_assistant_api_key(), Err(ConfigError::Missing { .. })));

        let config = AppConfig { assistant_api_key: Some(String::new()), ..Default::default() };
        assert!(matches!(config.require_assistant_api_key(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_assistant_api_key_present() {
        let config = AppConfig { assistant_api_key: Some("test-key".into()), ..Default::default() };
        assert_eq!(config.require_assistant_api_key().unwrap(), "test-key");
    }
}
