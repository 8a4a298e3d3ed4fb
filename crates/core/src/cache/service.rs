//! The campus content cache.
//!
//! Every public method degrades to a miss or a no-op on storage trouble: the
//! error is logged and the caller gets `false`, `None`, or nothing.

use std::future::Future;
use std::sync::Arc;

use super::coalesce::FillCoalescer;
use super::hash::content_fingerprint;
use super::key::CacheKey;
use super::policy::CachePolicy;
use super::record::{CacheEntry, CacheInfo, CacheMetadata, CacheSource, Fetched, Validity};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::store::{KeyValueStore, SqliteStore};
use crate::Error;

/// The half of a pair at which a write stopped.
#[derive(Debug)]
enum WriteFailure {
    /// Nothing was written.
    Entry(Error),
    /// The entry landed but its metadata did not.
    Metadata(Error),
}

impl WriteFailure {
    fn error(&self) -> &Error {
        match self {
            WriteFailure::Entry(e) | WriteFailure::Metadata(e) => e,
        }
    }
}

/// TTL cache of assistant responses keyed by content type, owner and scope.
#[derive(Debug)]
pub struct CampusCache {
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: CachePolicy,
    coalescer: FillCoalescer,
}

impl CampusCache {
    pub fn new(store: Arc<dyn KeyValueStore>, policy: CachePolicy) -> Self {
        Self { store, clock: Arc::new(SystemClock), policy, coalescer: FillCoalescer::new() }
    }

    /// Open the SQLite store named by the config and wrap it.
    pub async fn open(config: &AppConfig) -> Result<Self, Error> {
        let store = SqliteStore::open(&config.db_path)
            .await?
            .with_quota(config.storage_quota_bytes);
        tracing::info!(db_path = %config.db_path.display(), "opened cache store");
        Ok(Self::new(Arc::new(store), CachePolicy::from_config(config)))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Whether a fresh entry exists for the slot. Stale slots are evicted.
    pub async fn is_cached(&self, content_type: &str, owner_id: &str, scope_id: Option<&str>) -> bool {
        let key = CacheKey::new(content_type, owner_id, scope_id);
        self.fresh_metadata(&key).await.is_some()
    }

    /// The fresh entry for the slot, if any.
    pub async fn get_cached_content(
        &self, content_type: &str, owner_id: &str, scope_id: Option<&str>,
    ) -> Option<CacheEntry> {
        let key = CacheKey::new(content_type, owner_id, scope_id);
        let metadata = self.fresh_metadata(&key).await?;

        let raw = match self.store.get(key.entry()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = key.entry(), "metadata without entry, evicting");
                self.evict(&key).await;
                return None;
            }
            Err(e) => {
                tracing::warn!(key = key.entry(), error = %e, "cache entry read failed");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(key = key.entry(), error = %e, "undecodable cache entry, evicting");
                self.evict(&key).await;
                return None;
            }
        };

        if let Some(expected) = metadata.content_hash.as_deref()
            && content_fingerprint(&entry.content) != expected
        {
            tracing::debug!(key = key.entry(), "entry does not match its metadata, evicting");
            self.evict(&key).await;
            return None;
        }

        tracing::debug!(key = key.entry(), "cache hit");
        Some(entry)
    }

    /// Store `content` for the slot. Failures are logged, trigger one cleanup
    /// pass, and leave the slot empty.
    pub async fn set_cached_content(
        &self, content_type: &str, owner_id: &str, content: &str, scope_id: Option<&str>,
    ) {
        self.store_content(content_type, owner_id, content, scope_id).await;
    }

    /// Remove one slot.
    pub async fn clear_cache(&self, content_type: &str, owner_id: &str, scope_id: Option<&str>) {
        let key = CacheKey::new(content_type, owner_id, scope_id);
        self.evict(&key).await;
    }

    /// Diagnostic view of one slot.
    pub async fn get_cache_info(&self, content_type: &str, owner_id: &str, scope_id: Option<&str>) -> CacheInfo {
        let key = CacheKey::new(content_type, owner_id, scope_id);
        match self.fresh_metadata(&key).await {
            Some(meta) => {
                CacheInfo { is_cached: true, last_fetch: Some(meta.last_fetch), expires_at: Some(meta.expires_at) }
            }
            None => CacheInfo::default(),
        }
    }

    /// Serve the slot from cache, or run `fetch` once and store its result.
    ///
    /// Concurrent callers missing the same slot wait for the first one's fetch
    /// and are then served from the cache. If the store cannot keep the value
    /// each waiter falls through to its own fetch.
    pub async fn get_or_fetch<F, Fut, E>(
        &self, content_type: &str, owner_id: &str, scope_id: Option<&str>, fetch: F,
    ) -> Result<Fetched, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(entry) = self.get_cached_content(content_type, owner_id, scope_id).await {
            return Ok(Fetched { entry, source: CacheSource::Cache });
        }

        let key = CacheKey::new(content_type, owner_id, scope_id);
        let _fill = self.coalescer.acquire(key.entry()).await;

        if let Some(entry) = self.get_cached_content(content_type, owner_id, scope_id).await {
            return Ok(Fetched { entry, source: CacheSource::Cache });
        }

        tracing::debug!(key = key.entry(), "cache miss, fetching upstream");
        let content = fetch().await?;
        let entry = self.store_content(content_type, owner_id, &content, scope_id).await;

        Ok(Fetched { entry, source: CacheSource::Upstream })
    }

    /// Read the slot's metadata and classify it, evicting stale slots.
    async fn fresh_metadata(&self, key: &CacheKey) -> Option<CacheMetadata> {
        let raw = match self.store.get(key.metadata()).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = key.metadata(), error = %e, "cache metadata read failed");
                return None;
            }
        };

        let (validity, metadata) = match raw {
            None => (Validity::Missing, None),
            Some(raw) => match serde_json::from_str::<CacheMetadata>(&raw) {
                Ok(meta) => (self.classify(&meta), Some(meta)),
                Err(_) => (Validity::Corrupt, None),
            },
        };

        if validity.is_stale() {
            tracing::debug!(key = key.entry(), reason = validity.as_str(), "evicting stale cache slot");
            self.evict(key).await;
        }

        match validity {
            Validity::Fresh => metadata,
            _ => None,
        }
    }

    pub(crate) fn classify(&self, meta: &CacheMetadata) -> Validity {
        if meta.schema_version != self.policy.schema_version {
            Validity::VersionMismatch
        } else if meta.is_expired(self.now()) {
            Validity::Expired
        } else {
            Validity::Fresh
        }
    }

    /// Write entry then metadata. Returns the entry that was attempted.
    async fn store_content(
        &self, content_type: &str, owner_id: &str, content: &str, scope_id: Option<&str>,
    ) -> CacheEntry {
        let key = CacheKey::new(content_type, owner_id, scope_id);
        let now = self.now();

        let entry = CacheEntry {
            content: content.to_string(),
            created_at: now,
            owner_id: owner_id.to_string(),
            scope_id: scope_id.filter(|s| !s.is_empty()).map(str::to_string),
        };
        let metadata = CacheMetadata {
            last_fetch: now,
            expires_at: self.policy.expires_at(content_type, now),
            schema_version: self.policy.schema_version.clone(),
            content_hash: Some(content_fingerprint(content)),
        };

        match self.write_pair(&key, &entry, &metadata).await {
            Ok(()) => tracing::debug!(key = key.entry(), expires_at = metadata.expires_at, "cached content"),
            Err(failure) => {
                tracing::warn!(key = key.entry(), error = %failure.error(), "cache write failed, running cleanup");
                // A rejected entry write leaves the previous pair intact.
                if let WriteFailure::Metadata(_) = failure {
                    self.evict(&key).await;
                }
                let removed = self.cleanup().await;
                tracing::debug!(removed, "cleanup after failed write");
            }
        }

        entry
    }

    async fn write_pair(
        &self, key: &CacheKey, entry: &CacheEntry, metadata: &CacheMetadata,
    ) -> Result<(), WriteFailure> {
        let entry_json = serde_json::to_string(entry).map_err(|e| WriteFailure::Entry(e.into()))?;
        let metadata_json = serde_json::to_string(metadata).map_err(|e| WriteFailure::Entry(e.into()))?;
        self.store
            .set(key.entry(), &entry_json)
            .await
            .map_err(WriteFailure::Entry)?;
        self.store
            .set(key.metadata(), &metadata_json)
            .await
            .map_err(WriteFailure::Metadata)
    }

    /// Remove both halves of a slot, logging failures.
    pub(crate) async fn evict(&self, key: &CacheKey) {
        for k in [key.entry(), key.metadata()] {
            if let Err(e) = self.store.remove(k).await {
                tracing::warn!(key = k, error = %e, "cache delete failed");
            }
        }
    }
}
