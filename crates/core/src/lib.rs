//! Core types and shared functionality for camply.
//!
//! This crate provides:
//! - The campus content cache and its key scheme
//! - Key-value store port with in-memory and SQLite backends
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{CacheEntry, CacheInfo, CacheSize, CacheSource, CachePolicy, CampusCache, Fetched};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
