use std::future::Future;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo};

use super::{CreateDraftArgs, ListPostsArgs, PostsSvc};
use crate::infra::runtime::mcp_transport::ServerHandler;

impl ServerHandler for PostsSvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Proxy to per-tenant WordPress REST APIs. Pass `tenantKey` to pick the site.".into(),
            ),
            ..Default::default()
        }
    }
}

#[rmcp::tool_router]
impl PostsSvc {
    #[rmcp::tool(
        name = "list_posts",
        description = "List posts for a tenant. Params: tenantKey (string, required), status (string, optional: draft, publish, ...)"
    )]
    async fn list_posts_tool(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let args = ListPostsArgs::from_params(&params.0)
            .map_err(|e| rmcp::ErrorData::invalid_params(e, None))?;
        Ok(self.list_posts(args).await.into())
    }

    #[rmcp::tool(
        name = "create_draft_post",
        description = "Create a draft post for a tenant. Params: tenantKey, title, content (all strings, required)"
    )]
    async fn create_draft_post_tool(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let args = CreateDraftArgs::from_params(&params.0)
            .map_err(|e| rmcp::ErrorData::invalid_params(e, None))?;
        Ok(self.create_draft_post(args).await.into())
    }
}

pub type PostsRouter = ToolRouter<PostsSvc>;

impl PostsSvc {
    pub fn router() -> PostsRouter {
        Self::tool_router()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::request::UpstreamRequest;
    use crate::clients::upstream::Upstream;
    use crate::core::envelope::ResultEnvelope;
    use crate::domain::{TenantConfig, TenantRegistry};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct Canned;

    #[async_trait]
    impl Upstream for Canned {
        async fn execute(&self, _request: UpstreamRequest) -> ResultEnvelope {
            ResultEnvelope::success("[]")
        }
    }

    fn svc() -> PostsSvc {
        let tenants = TenantRegistry::new()
            .with_tenant("carbureto", TenantConfig::new("https://example.com/wp-json", "t"));
        PostsSvc::new(tenants, Arc::new(Canned))
    }

    fn params(v: serde_json::Value) -> Parameters<JsonObject> {
        Parameters(v.as_object().unwrap().clone())
    }

    #[test]
    fn router_exposes_both_tools() {
        let names: Vec<String> = PostsSvc::router()
            .into_iter()
            .map(|r| r.name().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "list_posts"), "got: {names:?}");
        assert!(names.iter().any(|n| n == "create_draft_post"), "got: {names:?}");
    }

    #[tokio::test]
    async fn missing_tenant_key_is_invalid_params() {
        let err = svc()
            .list_posts_tool(params(json!({"status":"draft"})))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("tenantKey"));
    }

    #[tokio::test]
    async fn missing_title_is_invalid_params() {
        let err = svc()
            .create_draft_post_tool(params(json!({"tenantKey":"carbureto","content":"c"})))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("title"));
    }

    #[tokio::test]
    async fn unknown_tenant_is_error_result_not_protocol_error() {
        let res = svc()
            .list_posts_tool(params(json!({"tenantKey":"nope"})))
            .await
            .unwrap();
        assert_eq!(res.is_error, Some(true));
        let v = serde_json::to_value(&res).unwrap();
        assert!(v["content"][0]["text"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn known_tenant_returns_success_result() {
        let res = svc()
            .list_posts_tool(params(json!({"tenantKey":"carbureto"})))
            .await
            .unwrap();
        assert_eq!(res.is_error, Some(false));
    }

    #[test]
    fn advertises_tools_capability() {
        let info = svc().get_info();
        assert!(info.capabilities.tools.is_some());
    }
}
