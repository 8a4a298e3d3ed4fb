//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and maintaining the campus cache.

pub mod clear;
pub mod info;
pub mod purge;
pub mod size;

pub use clear::{CacheClearParams, clear_impl};
pub use info::{CacheInfoParams, info_impl};
pub use purge::{CachePurgeParams, purge_impl};
pub use size::{CacheSizeParams, size_impl};
