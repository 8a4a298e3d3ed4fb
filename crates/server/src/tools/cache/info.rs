//! cache_info tool implementation.
//!
//! Reports whether one slot holds fresh content and when it expires.

use camply_core::{CacheInfo, CampusCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{json_result, require_non_empty};

/// Parameters for the cache_info tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInfoParams {
    /// Content type of the slot, e.g. "campus-news".
    pub content_type: String,

    /// User the content was cached for.
    pub owner_id: String,

    /// Optional sub-scope, usually a college id.
    #[serde(default)]
    pub scope_id: Option<String>,
}

/// Implementation of the cache_info tool.
pub async fn info_impl(cache: &CampusCache, params: CacheInfoParams) -> Result<CallToolResult, McpError> {
    require_non_empty("content_type", &params.content_type)?;
    require_non_empty("owner_id", &params.owner_id)?;

    let info: CacheInfo = cache
        .get_cache_info(&params.content_type, &params.owner_id, params.scope_id.as_deref())
        .await;

    json_result(&info)
}
