//! String-keyed persistence port used by the cache.
//!
//! The cache only ever talks to a [`KeyValueStore`]. Two backends ship here:
//!
//! - [`MemoryStore`]: process-local map, mostly for tests and ephemeral runs
//! - [`SqliteStore`]: single-table SQLite database driven by tokio-rusqlite
//!
//! Both enforce an optional byte quota (key + value lengths). A write that
//! would cross it fails with [`Error::QuotaExceeded`].

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use async_trait::async_trait;

use crate::Error;

pub use connection::SqliteStore;
pub use memory::MemoryStore;

/// A string-keyed, string-valued store shared by the cache and other state.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Insert or overwrite `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), Error>;

    /// Every key currently stored, in no particular order.
    async fn keys(&self) -> Result<Vec<String>, Error>;
}

/// Bytes a single key/value pair counts against the quota.
pub(crate) fn pair_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
