//! cache_size tool implementation.

use camply_core::CampusCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_size tool (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheSizeParams {}

/// Implementation of the cache_size tool.
pub async fn size_impl(cache: &CampusCache, _params: CacheSizeParams) -> Result<CallToolResult, McpError> {
    json_result(&cache.get_cache_size().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::cache::fixtures::memory_cache;
    use crate::tools::result_text;
    use camply_core::CacheSize;

    #[tokio::test]
    async fn test_size_empty() {
        let cache = memory_cache();
        let result = size_impl(&cache, CacheSizeParams::default()).await.unwrap();
        let output: CacheSize = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(output, CacheSize::default());
    }

    #[tokio::test]
    async fn test_size_counts_entry_and_metadata() {
        let cache = memory_cache();
        cache.set_cached_content("events", "userA", "fest", None).await;

        let result = size_impl(&cache, CacheSizeParams::default()).await.unwrap();
        let output: CacheSize = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(output.total_keys, 2);
        assert!(output.estimated_size > "fest".len());
    }
}
