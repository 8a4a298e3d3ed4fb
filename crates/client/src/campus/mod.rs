//! Cache-through loading of campus content.
//!
//! A [`ContentRequest`] names a content type, the user asking, and the
//! campus. The service serves it from [`CampusCache`] when fresh and asks the
//! [`ContentGenerator`] otherwise.

pub mod content_type;

pub use content_type::{CampusContext, ContentType};

use std::sync::Arc;

use async_trait::async_trait;
use camply_core::{CacheSource, CampusCache, Error};
use serde::Serialize;

/// Upstream producer of campus content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, Error>;
}

/// One dashboard load.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub content_type: ContentType,
    pub owner_id: String,
    pub campus: CampusContext,
    /// Drop the cached slot before loading.
    pub force_refresh: bool,
}

impl ContentRequest {
    pub fn new(content_type: ContentType, owner_id: impl Into<String>, campus: CampusContext) -> Self {
        Self { content_type, owner_id: owner_id.into(), campus, force_refresh: false }
    }

    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    fn scope(&self) -> Option<&str> {
        self.campus.college_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Content handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusContent {
    pub content_type: ContentType,
    pub content: String,
    /// Epoch milliseconds at which the content was generated.
    pub created_at: i64,
    pub source: CacheSource,
}

/// Serves campus content from the cache, generating it on a miss.
#[derive(Clone)]
pub struct CampusContentService {
    cache: Arc<CampusCache>,
    generator: Arc<dyn ContentGenerator>,
}

impl std::fmt::Debug for CampusContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampusContentService").field("cache", &self.cache).finish_non_exhaustive()
    }
}

impl CampusContentService {
    pub fn new(cache: Arc<CampusCache>, generator: Arc<dyn ContentGenerator>) -> Self {
        Self { cache, generator }
    }

    pub fn cache(&self) -> &Arc<CampusCache> {
        &self.cache
    }

    pub async fn load(&self, req: &ContentRequest) -> Result<CampusContent, Error> {
        if req.owner_id.trim().is_empty() {
            return Err(Error::InvalidInput("owner_id cannot be empty".to_string()));
        }
        if req.campus.college_name.trim().is_empty() {
            return Err(Error::InvalidInput("college_name cannot be empty".to_string()));
        }

        let content_type = req.content_type.as_str();
        let scope = req.scope();

        if req.force_refresh {
            tracing::debug!(content_type, owner_id = %req.owner_id, "forced refresh, clearing slot");
            self.cache.clear_cache(content_type, &req.owner_id, scope).await;
        }

        let prompt = req.content_type.prompt(&req.campus);
        let generator = Arc::clone(&self.generator);
        let fetched = self
            .cache
            .get_or_fetch(content_type, &req.owner_id, scope, || async move { generator.generate(&prompt).await })
            .await?;

        tracing::info!(content_type, owner_id = %req.owner_id, source = ?fetched.source, "campus content loaded");

        Ok(CampusContent {
            content_type: req.content_type,
            content: fetched.entry.content,
            created_at: fetched.entry.created_at,
            source: fetched.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camply_core::{CachePolicy, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentGenerator for CountingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, Error> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("reply {n}: {}", prompt.len()))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, Error> {
            Err(Error::AssistantRateLimited("slow down".to_string()))
        }
    }

    fn service(generator: Arc<dyn ContentGenerator>) -> CampusContentService {
        let cache = CampusCache::new(Arc::new(MemoryStore::new()), CachePolicy::default());
        CampusContentService::new(Arc::new(cache), generator)
    }

    fn request() -> ContentRequest {
        ContentRequest::new(ContentType::CampusNews, "userA", CampusContext::new("IIT Delhi").with_id("college-42"))
    }

    #[tokio::test]
    async fn test_load_generates_then_serves_from_cache() {
        let generator = Arc::new(CountingGenerator::default());
        let svc = service(generator.clone());

        let first = svc.load(&request()).await.unwrap();
        assert_eq!(first.source, CacheSource::Upstream);
        assert!(first.content.starts_with("reply 1"));

        let second = svc.load(&request()).await.unwrap();
        assert_eq!(second.source, CacheSource::Cache);
        assert_eq!(second.content, first.content);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_uses_college_id_as_scope() {
        let svc = service(Arc::new(CountingGenerator::default()));
        svc.load(&request()).await.unwrap();

        assert!(svc.cache().is_cached("campus-news", "userA", Some("college-42")).await);
        assert!(!svc.cache().is_cached("campus-news", "userA", None).await);
    }

    #[tokio::test]
    async fn test_force_refresh_regenerates() {
        let generator = Arc::new(CountingGenerator::default());
        let svc = service(generator.clone());

        svc.load(&request()).await.unwrap();
        let refreshed = svc.load(&request().force_refresh(true)).await.unwrap();

        assert_eq!(refreshed.source, CacheSource::Upstream);
        assert!(refreshed.content.starts_with("reply 2"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_generator_error_is_not_cached() {
        let svc = service(Arc::new(FailingGenerator));

        let err = svc.load(&request()).await.unwrap_err();
        assert!(matches!(err, Error::AssistantRateLimited(_)));
        assert!(!svc.cache().is_cached("campus-news", "userA", Some("college-42")).await);
    }

    #[tokio::test]
    async fn test_rejects_empty_owner() {
        let svc = service(Arc::new(CountingGenerator::default()));
        let req = ContentRequest::new(ContentType::Events, "  ", CampusContext::new("MIT"));
        assert!(matches!(svc.load(&req).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_content_types_are_separate_slots() {
        let generator = Arc::new(CountingGenerator::default());
        let svc = service(generator.clone());

        svc.load(&request()).await.unwrap();
        let mut events = request();
        events.content_type = ContentType::Events;
        let loaded = svc.load(&events).await.unwrap();

        assert_eq!(loaded.source, CacheSource::Upstream);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }
}
