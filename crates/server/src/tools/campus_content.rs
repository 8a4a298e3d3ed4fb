//! campus_content tool implementation.
//!
//! Loads one kind of campus content for a user, from the cache when fresh and
//! from the assistant otherwise.

use camply_client::{CampusContentService, CampusContext, ContentRequest, ContentType};
use camply_core::{CacheSource, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{json_result, require_non_empty};

/// Input parameters for campus_content tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CampusContentParams {
    /// One of: campus-news, placements, campus-stats, events, academics, facilities.
    pub content_type: String,

    /// User the content is loaded for.
    pub owner_id: String,

    /// College name used in the prompt.
    pub college_name: String,

    /// Stable college id; cached content is scoped to it.
    #[serde(default)]
    pub college_id: Option<String>,

    /// City or region of the college.
    #[serde(default)]
    pub location: Option<String>,

    /// Force a refresh, bypassing the cache.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for campus_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampusContentOutput {
    pub content_type: String,
    /// Markdown produced by the assistant.
    pub content: String,
    /// Epoch milliseconds at which the content was generated.
    pub created_at: i64,
    pub source: CacheSource,
}

impl CampusContentParams {
    fn into_request(self) -> Result<ContentRequest, Error> {
        require_non_empty("owner_id", &self.owner_id)?;
        require_non_empty("college_name", &self.college_name)?;
        let content_type: ContentType = self.content_type.parse()?;

        let campus = CampusContext {
            college_name: self.college_name,
            college_id: self.college_id.filter(|id| !id.is_empty()),
            location: self.location,
        };

        Ok(ContentRequest::new(content_type, self.owner_id, campus).force_refresh(self.force_refresh))
    }
}

/// Implementation of the campus_content tool.
///
/// Without a configured assistant the tool fails with `AssistantDisabled`.
pub async fn content_impl(
    service: Option<&CampusContentService>, params: CampusContentParams,
) -> Result<CallToolResult, McpError> {
    let service = service.ok_or(Error::AssistantDisabled)?;
    let request = params.into_request()?;

    let loaded = service.load(&request).await?;

    json_result(&CampusContentOutput {
        content_type: loaded.content_type.as_str().to_string(),
        content: loaded.content,
        created_at: loaded.created_at,
        source: loaded.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::cache::fixtures::memory_cache;
    use crate::tools::result_text;
    use async_trait::async_trait;
    use camply_client::ContentGenerator;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentGenerator for CountingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("## Generated\n{prompt}"))
        }
    }

    fn params() -> CampusContentParams {
        CampusContentParams {
            content_type: "campus-news".to_string(),
            owner_id: "userA".to_string(),
            college_name: "IIT Bombay".to_string(),
            college_id: Some("college-42".to_string()),
            location: Some("Mumbai".to_string()),
            force_refresh: false,
        }
    }

    fn output(result: &CallToolResult) -> CampusContentOutput {
        serde_json::from_str(&result_text(result)).unwrap()
    }

    #[tokio::test]
    async fn test_content_then_cache_hit() {
        let generator = Arc::new(CountingGenerator::default());
        let service = CampusContentService::new(Arc::new(memory_cache()), generator.clone());

        let first = output(&content_impl(Some(&service), params()).await.unwrap());
        assert_eq!(first.source, CacheSource::Upstream);
        assert!(first.content.contains("IIT Bombay (Mumbai)"));

        let second = output(&content_impl(Some(&service), params()).await.unwrap());
        assert_eq!(second.source, CacheSource::Cache);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh() {
        let generator = Arc::new(CountingGenerator::default());
        let service = CampusContentService::new(Arc::new(memory_cache()), generator.clone());

        content_impl(Some(&service), params()).await.unwrap();
        let refreshed = CampusContentParams { force_refresh: true, ..params() };
        let out = output(&content_impl(Some(&service), refreshed).await.unwrap());

        assert_eq!(out.source, CacheSource::Upstream);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_assistant_disabled() {
        let err = content_impl(None, params()).await.unwrap_err();
        assert_eq!(err.code.0, -32010);
    }

    #[tokio::test]
    async fn test_unknown_content_type() {
        let service =
            CampusContentService::new(Arc::new(memory_cache()), Arc::new(CountingGenerator::default()));
        let bad = CampusContentParams { content_type: "weather".to_string(), ..params() };

        let err = content_impl(Some(&service), bad).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
