use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::clients::upstream::UpstreamClient;
use crate::infra::config::{Config, GatewayConfig};
use crate::tools::posts::PostsSvc;

/// Load and validate the gateway file, then wire registry + upstream client.
pub fn build_service(path: &Path) -> anyhow::Result<PostsSvc> {
    let gateway = GatewayConfig::load(path)?;
    service_from_config(&gateway)
}

pub fn service_from_config(gateway: &GatewayConfig) -> anyhow::Result<PostsSvc> {
    gateway.validate()?;
    let tenants = gateway.tenant_registry()?;
    let upstream = UpstreamClient::new(&gateway.upstream)?;
    tracing::info!(
        tenants = tenants.len(),
        timeout_ms = gateway.upstream.timeout_ms,
        status_policy = ?gateway.upstream.status_policy,
        "tenant registry loaded"
    );
    Ok(PostsSvc::new(tenants, Arc::new(upstream)))
}

pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        config = %cfg.config_path.display(),
        "BOOT wordpress-mcp-gateway"
    );
    let svc = build_service(&cfg.config_path)
        .with_context(|| format!("loading {}", cfg.config_path.display()))?;

    if cfg.mode == "stdio" {
        return crate::infra::runtime::mcp_transport::serve_stdio(svc).await;
    }

    let app = crate::infra::http_app::build_app(svc);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
