//! cache_purge tool implementation.
//!
//! Runs a cleanup pass over the cache namespace, removing expired,
//! version-stale, corrupt and orphaned slots.

use camply_core::CampusCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of keys removed.
    pub deleted: usize,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CampusCache, _params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let deleted = cache.cleanup().await;
    tracing::info!(deleted, "cache purge finished");
    json_result(&CachePurgeOutput { deleted })
}
