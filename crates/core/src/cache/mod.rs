//! TTL cache for assistant-generated campus content.
//!
//! Each slot is two records in a [`KeyValueStore`](crate::store::KeyValueStore):
//! the entry (payload, owner, scope) and its metadata (fetch time, expiry,
//! schema tag, content fingerprint). It supports:
//!
//! - Read-time eviction of expired and version-stale slots
//! - Per-slot and per-user invalidation
//! - Opportunistic cleanup when a write fails
//! - Single-flight fills through [`CampusCache::get_or_fetch`]

pub mod cleanup;
pub mod coalesce;
pub mod hash;
pub mod key;
pub mod policy;
pub mod record;
pub mod service;

pub use key::{CACHE_NAMESPACE, CacheKey, KeyParts};
pub use policy::CachePolicy;
pub use record::{CacheEntry, CacheInfo, CacheMetadata, CacheSize, CacheSource, Fetched, Validity};
pub use service::CampusCache;
