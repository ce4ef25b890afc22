//! Hosts the posts tools over MCP: stdio for a local agent, streamable HTTP behind axum.

use std::sync::Arc;

use rmcp::handler::server::router::Router;
use rmcp::serve_server;
use rmcp::transport::streamable_http_server::tower::{StreamableHttpServerConfig, StreamableHttpService};

use crate::tools::posts::PostsSvc;

pub use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
pub use rmcp::ServerHandler;

/// The posts handler with its tool table attached.
pub type PostsMcpRouter = Router<PostsSvc>;

pub type PostsHttpService = StreamableHttpService<PostsMcpRouter, LocalSessionManager>;

fn mcp_router(svc: PostsSvc) -> PostsMcpRouter {
    Router::new(svc).with_tools(PostsSvc::router())
}

/// Serve one MCP session on stdin/stdout until the client disconnects.
pub async fn serve_stdio(svc: PostsSvc) -> anyhow::Result<()> {
    tracing::info!(tenants = svc.tenants().len(), "serving MCP over stdio");
    let running = serve_server(mcp_router(svc), (tokio::io::stdin(), tokio::io::stdout()))
        .await
        .map_err(|e| anyhow::anyhow!("stdio MCP handshake failed: {e}"))?;
    let reason = running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("stdio MCP session aborted: {e}"))?;
    tracing::info!(reason = ?reason, "stdio MCP session ended");
    Ok(())
}

/// Every HTTP session gets its own clone of `svc`; clones share the tenant table
/// and the upstream connection pool.
pub fn posts_http_service(svc: PostsSvc, session_mgr: Arc<LocalSessionManager>) -> PostsHttpService {
    let cfg = StreamableHttpServerConfig::default();
    tracing::debug!(
        stateful_mode = cfg.stateful_mode,
        tenants = svc.tenants().len(),
        "streamable HTTP MCP service"
    );
    StreamableHttpService::new(move || Ok(mcp_router(svc.clone())), session_mgr, cfg)
}
