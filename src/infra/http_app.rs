use axum::{
    routing::{any_service, get},
    Router,
};
use std::sync::Arc;

use crate::infra::runtime::mcp_transport::{self, LocalSessionManager};
use crate::tools::posts::PostsSvc;

/// `/healthz` + streamable MCP at `/mcp`.
pub fn build_app(svc: PostsSvc) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = mcp_transport::posts_http_service(svc, session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}
