//! camply-mcp server entry point.
//!
//! Loads configuration, opens the campus cache, wires the assistant when a key
//! is configured, and serves MCP on stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use camply_client::{AssistantClient, CampusContentService, ContentGenerator};
use camply_core::{AppConfig, CampusCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), schema_version = %config.schema_version, "Starting camply-mcp server on stdio transport");

    let cache = Arc::new(CampusCache::open(&config).await?);
    let purged = cache.cleanup().await;
    tracing::debug!(purged, "startup cleanup done");

    let content = match AssistantClient::from_app_config(&config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "assistant enabled");
            let generator: Arc<dyn ContentGenerator> = Arc::new(client);
            Some(CampusContentService::new(Arc::clone(&cache), generator))
        }
        Err(e) => {
            tracing::warn!(error = %e, "assistant disabled; campus_content will fail until a key is configured");
            None
        }
    };

    let handler = handler::CamplyServer::new(cache, content);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
