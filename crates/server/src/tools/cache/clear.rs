//! cache_clear tool implementation.
//!
//! Clears one slot when a content type is given, otherwise every slot the
//! user owns.

use camply_core::{CampusCache, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{json_result, require_non_empty};

/// Parameters for the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearParams {
    /// User whose cache is cleared.
    pub owner_id: String,

    /// Clear only this content type. Omit to clear everything the user owns.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Sub-scope of the slot. Only valid together with `content_type`.
    #[serde(default)]
    pub scope_id: Option<String>,
}

/// What a clear call covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClearScope {
    Slot,
    User,
}

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearOutput {
    pub cleared: ClearScope,
    /// Keys removed; reported for user-wide clears.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_keys: Option<usize>,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl(cache: &CampusCache, params: CacheClearParams) -> Result<CallToolResult, McpError> {
    require_non_empty("owner_id", &params.owner_id)?;

    let output = match params.content_type.as_deref() {
        Some(content_type) => {
            require_non_empty("content_type", content_type)?;
            cache
                .clear_cache(content_type, &params.owner_id, params.scope_id.as_deref())
                .await;
            CacheClearOutput { cleared: ClearScope::Slot, removed_keys: None }
        }
        None if params.scope_id.is_some() => {
            return Err(Error::InvalidInput("scope_id requires content_type".to_string()).into());
        }
        None => {
            let removed = cache.clear_user_cache(&params.owner_id).await;
            CacheClearOutput { cleared: ClearScope::User, removed_keys: Some(removed) }
        }
    };

    tracing::debug!(owner_id = %params.owner_id, cleared = ?output.cleared, "cache cleared");
    json_result(&output)
}
