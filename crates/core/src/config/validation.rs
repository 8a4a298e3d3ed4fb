//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

const MIN_TTL_SECS: u64 = 60;
const MAX_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const MAX_QUOTA_BYTES: usize = 512 * 1024 * 1024;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn check_ttl(field: String, secs: u64) -> Result<(), ConfigError> {
    if secs < MIN_TTL_SECS {
        return Err(ConfigError::Invalid { field, reason: format!("must be at least {MIN_TTL_SECS} seconds") });
    }
    if secs > MAX_TTL_SECS {
        return Err(ConfigError::Invalid { field, reason: "must not exceed 30 days".into() });
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `schema_version` or `assistant_model` or `user_agent` is empty
    /// - any TTL is below one minute or above 30 days
    /// - `storage_quota_bytes` is 0 or exceeds 512MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `assistant_base_url` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "schema_version".into(), reason: "must not be empty".into() });
        }

        check_ttl("cache_ttl_secs".into(), self.cache_ttl_secs)?;
        for (content_type, secs) in &self.content_ttl_secs {
            check_ttl(format!("content_ttl_secs.{content_type}"), *secs)?;
        }

        if self.storage_quota_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "storage_quota_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.storage_quota_bytes > MAX_QUOTA_BYTES {
            return Err(ConfigError::Invalid {
                field: "storage_quota_bytes".into(),
                reason: "must not exceed 512MB".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.assistant_model.is_empty() {
            return Err(ConfigError::Invalid { field: "assistant_model".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.assistant_base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::Invalid {
                    field: "assistant_base_url".into(),
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "assistant_base_url".into(), reason: e.to_string() });
            }
        }

        if self.assistant_api_key.is_none() {
            tracing::debug!("assistant_api_key not set; campus content generation disabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_schema_version() {
        let config = AppConfig { schema_version: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "schema_version"));
    }

    #[test]
    fn test_validate_ttl_too_small() {
        let config = AppConfig { cache_ttl_secs: 59, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_secs"));
    }

    #[test]
    fn test_validate_ttl_exceeds_limit() {
        let config = AppConfig { cache_ttl_secs: 31 * 24 * 60 * 60, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_secs"));
    }

    #[test]
    fn test_validate_content_ttl_override() {
        let mut config = AppConfig::default();
        config.content_ttl_secs.insert("campus-news".into(), 10);
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "content_ttl_secs.campus-news"));

        config.content_ttl_secs.insert("campus-news".into(), 6 * 60 * 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_quota_zero() {
        let config = AppConfig { storage_quota_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "storage_quota_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_base_url() {
        let config = AppConfig { assistant_base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "assistant_base_url"));

        let config = AppConfig { assistant_base_url: "ftp://example.com".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "assistant_base_url"));

        let config = AppConfig { assistant_base_url: "http://localhost:8080/v1".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            cache_ttl_secs: 60,
            storage_quota_bytes: 1,
            timeout_ms: 100,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
