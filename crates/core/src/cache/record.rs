//! Records persisted by the cache and the values it reports back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A cached assistant response for one `(content_type, owner, scope)` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub content: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
}

/// Validity record stored beside each entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub last_fetch: i64,
    pub expires_at: i64,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl CacheMetadata {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }
}

/// Outcome of checking one slot's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Fresh,
    Missing,
    Expired,
    VersionMismatch,
    Corrupt,
}

impl Validity {
    /// Stale slots are evicted when observed.
    pub fn is_stale(self) -> bool {
        matches!(self, Validity::Expired | Validity::VersionMismatch | Validity::Corrupt)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Validity::Fresh => "fresh",
            Validity::Missing => "missing",
            Validity::Expired => "expired",
            Validity::VersionMismatch => "version_mismatch",
            Validity::Corrupt => "corrupt",
        }
    }
}

/// Diagnostic view of one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub is_cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Footprint of the cache namespace in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheSize {
    pub total_keys: usize,
    pub estimated_size: usize,
}

/// Where a value returned by `get_or_fetch` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CacheSource {
    Cache,
    Upstream,
}

/// Result of a cache-through lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub entry: CacheEntry,
    pub source: CacheSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let entry = CacheEntry {
            content: "hi".into(),
            created_at: 5,
            owner_id: "u1".into(),
            scope_id: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"content":"hi","createdAt":5,"ownerId":"u1"}"#);
    }

    #[test]
    fn test_metadata_without_hash_parses() {
        let meta: CacheMetadata =
            serde_json::from_str(r#"{"lastFetch":1,"expiresAt":2,"schemaVersion":"1.0.0"}"#).unwrap();
        assert!(meta.content_hash.is_none());
        assert!(!meta.is_expired(2));
        assert!(meta.is_expired(3));
    }

    #[test]
    fn test_reports_use_camel_case() {
        let info = CacheInfo { is_cached: true, last_fetch: Some(1), expires_at: Some(2) };
        assert_eq!(serde_json::to_string(&info).unwrap(), r#"{"isCached":true,"lastFetch":1,"expiresAt":2}"#);

        let size = CacheSize { total_keys: 2, estimated_size: 40 };
        assert_eq!(serde_json::to_string(&size).unwrap(), r#"{"totalKeys":2,"estimatedSize":40}"#);
    }

    #[test]
    fn test_validity_staleness() {
        assert!(!Validity::Fresh.is_stale());
        assert!(!Validity::Missing.is_stale());
        assert!(Validity::Expired.is_stale());
        assert!(Validity::VersionMismatch.is_stale());
        assert!(Validity::Corrupt.is_stale());
    }
}
