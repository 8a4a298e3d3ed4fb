//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::cache::{
    CacheClearParams, CacheInfoParams, CachePurgeParams, CacheSizeParams, clear_impl, info_impl, purge_impl,
    size_impl,
};
use crate::tools::campus_content::{CampusContentParams, content_impl};

use camply_client::CampusContentService;
use camply_core::CampusCache;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for camply.
#[derive(Clone)]
pub struct CamplyServer {
    tool_router: ToolRouter<Self>,
    cache: Arc<CampusCache>,
    /// Absent when no assistant API key is configured.
    content: Option<CampusContentService>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl CamplyServer {
    /// Create a new server handler around a shared cache.
    pub fn new(cache: Arc<CampusCache>, content: Option<CampusContentService>) -> Self {
        Self { tool_router: Self::tool_router(), cache, content }
    }

    /// Load campus content for a user.
    #[tool(
        description = "Load campus content (campus-news, placements, campus-stats, events, academics, facilities) for a user and college. Served from a 24h cache when fresh; set force_refresh to regenerate."
    )]
    async fn campus_content(&self, params: Parameters<CampusContentParams>) -> Result<CallToolResult, McpError> {
        content_impl(self.content.as_ref(), params.0).await
    }

    /// Inspect one cache slot.
    #[tool(description = "Report whether a (content_type, owner_id, scope_id) slot is cached and when it expires.")]
    async fn cache_info(&self, params: Parameters<CacheInfoParams>) -> Result<CallToolResult, McpError> {
        info_impl(&self.cache, params.0).await
    }

    /// Clear one slot or a whole user.
    #[tool(
        description = "Clear cached content. With content_type clears one slot; without it clears everything the owner has cached."
    )]
    async fn cache_clear(&self, params: Parameters<CacheClearParams>) -> Result<CallToolResult, McpError> {
        clear_impl(&self.cache, params.0).await
    }

    /// Report the cache footprint.
    #[tool(description = "Count cache keys and their approximate size in bytes.")]
    async fn cache_size(&self, params: Parameters<CacheSizeParams>) -> Result<CallToolResult, McpError> {
        size_impl(&self.cache, params.0).await
    }

    /// Remove stale slots.
    #[tool(description = "Remove expired, version-stale, corrupt and orphaned cache entries. Returns the number of keys deleted.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, params.0).await
    }
}

impl ServerHandler for CamplyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "camply-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
