//! Expiry and versioning rules applied by the cache.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::{AppConfig, DEFAULT_CACHE_TTL_SECS, DEFAULT_SCHEMA_VERSION};

/// Schema tag plus TTLs, per content type where configured.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub schema_version: String,
    pub default_ttl: Duration,
    pub ttl_overrides: HashMap<String, Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            default_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            ttl_overrides: HashMap::new(),
        }
    }
}

impl CachePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            schema_version: config.schema_version.clone(),
            default_ttl: config.cache_ttl(),
            ttl_overrides: config
                .content_ttl_secs
                .iter()
                .map(|(content_type, secs)| (content_type.clone(), Duration::from_secs(*secs)))
                .collect(),
        }
    }

    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    pub fn with_ttl_override(mut self, content_type: impl Into<String>, ttl: Duration) -> Self {
        self.ttl_overrides.insert(content_type.into(), ttl);
        self
    }

    pub fn ttl_for(&self, content_type: &str) -> Duration {
        self.ttl_overrides
            .get(content_type)
            .copied()
            .unwrap_or(self.default_ttl)
    }

    /// Expiry timestamp of an entry written at `now_millis`.
    pub fn expires_at(&self, content_type: &str, now_millis: i64) -> i64 {
        let ttl_ms = i64::try_from(self.ttl_for(content_type).as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_add(ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_24h() {
        let policy = CachePolicy::default();
        assert_eq!(policy.expires_at("campus-news", 1_000), 1_000 + 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_override_applies_to_one_type() {
        let policy = CachePolicy::default().with_ttl_override("campus-news", Duration::from_secs(3600));
        assert_eq!(policy.ttl_for("campus-news"), Duration::from_secs(3600));
        assert_eq!(policy.ttl_for("campus-stats"), Duration::from_secs(86_400));
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig { schema_version: "2".into(), cache_ttl_secs: 600, ..Default::default() };
        config.content_ttl_secs.insert("events".into(), 120);

        let policy = CachePolicy::from_config(&config);
        assert_eq!(policy.schema_version, "2");
        assert_eq!(policy.ttl_for("events"), Duration::from_secs(120));
        assert_eq!(policy.ttl_for("news"), Duration::from_secs(600));
    }
}
