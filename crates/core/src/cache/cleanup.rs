//! Scans over the whole store: cleanup, per-user clearing, size reporting.
//!
//! These are linear in the number of stored keys. Only keys that parse as
//! cache keys are ever read or removed.

use std::collections::HashSet;

use super::key::{CacheKey, METADATA_SUFFIX};
use super::record::{CacheMetadata, CacheSize, Validity};
use super::service::CampusCache;

impl CampusCache {
    /// Remove expired, version-stale and unreadable slots plus orphaned entries.
    ///
    /// Returns the number of keys removed. Never fails; a bad key is logged and
    /// skipped.
    pub async fn cleanup(&self) -> usize {
        let keys = match self.store.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "cache cleanup could not list keys");
                return 0;
            }
        };

        let mut removed = 0;
        let mut live_entries = HashSet::new();

        for key in keys.iter().filter_map(|k| CacheKey::from_metadata_key(k)) {
            let validity = match self.store.get(key.metadata()).await {
                Ok(Some(raw)) => match serde_json::from_str::<CacheMetadata>(&raw) {
                    Ok(meta) => self.classify(&meta),
                    Err(_) => Validity::Corrupt,
                },
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(key = key.metadata(), error = %e, "cache cleanup read failed");
                    live_entries.insert(key.entry().to_string());
                    continue;
                }
            };

            if validity.is_stale() {
                tracing::debug!(key = key.entry(), reason = validity.as_str(), "cleanup removing slot");
                removed += self.remove_keys(&[key.entry(), key.metadata()]).await;
            } else {
                live_entries.insert(key.entry().to_string());
            }
        }

        for entry in keys.iter().filter(|k| CacheKey::is_entry_key(k)) {
            let has_metadata = keys.contains(&format!("{entry}{METADATA_SUFFIX}"));
            if !has_metadata && !live_entries.contains(entry.as_str()) {
                tracing::debug!(key = entry.as_str(), "cleanup removing orphaned entry");
                removed += self.remove_keys(&[entry.as_str()]).await;
            }
        }

        if removed > 0 {
            tracing::info!(removed, "cache cleanup finished");
        }
        removed
    }

    /// Remove every cache key owned by `owner_id`. Returns keys removed.
    pub async fn clear_user_cache(&self, owner_id: &str) -> usize {
        let keys = match self.store.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(owner_id, error = %e, "clear_user_cache could not list keys");
                return 0;
            }
        };

        let owned: Vec<&str> = keys
            .iter()
            .filter(|k| CacheKey::parse(k).is_some_and(|parts| parts.owner_id == owner_id))
            .map(String::as_str)
            .collect();

        let removed = self.remove_keys(&owned).await;
        tracing::debug!(owner_id, removed, "cleared user cache");
        removed
    }

    /// Key count and byte footprint of the cache namespace.
    pub async fn get_cache_size(&self) -> CacheSize {
        let keys = match self.store.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "get_cache_size could not list keys");
                return CacheSize::default();
            }
        };

        let mut size = CacheSize::default();
        for key in keys.iter().filter(|k| CacheKey::parse(k).is_some()) {
            size.total_keys += 1;
            match self.store.get(key).await {
                Ok(Some(value)) => size.estimated_size += key.len() + value.len(),
                Ok(None) => size.total_keys -= 1,
                Err(e) => tracing::warn!(key = key.as_str(), error = %e, "get_cache_size read failed"),
            }
        }
        size
    }

    async fn remove_keys(&self, keys: &[&str]) -> usize {
        let mut removed = 0;
        for key in keys {
            match self.store.remove(key).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(key, error = %e, "cache delete failed"),
            }
        }
        removed
    }
}
