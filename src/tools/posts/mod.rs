//! Post operations: resolve the tenant, build one upstream call, label the envelope.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value as JsonValue;

use crate::clients::request::build;
use crate::clients::upstream::Upstream;
use crate::core::envelope::ResultEnvelope;
use crate::domain::{NewPost, TenantRegistry, POSTS_PATH};

pub mod tool_router;

pub const LIST_ERROR_PREFIX: &str = "Error fetching posts: ";
pub const CREATE_ERROR_PREFIX: &str = "Error creating post: ";
pub const CREATE_SUCCESS_PREFIX: &str = "Draft post created: ";

/// Accepted names for the tenant parameter; `clientId` is kept for older clients.
const TENANT_KEYS: [&str; 2] = ["tenantKey", "clientId"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPostsArgs {
    pub tenant_key: String,
    pub status: Option<String>,
}

impl ListPostsArgs {
    pub fn from_params(params: &serde_json::Map<String, JsonValue>) -> Result<Self, String> {
        Ok(Self {
            tenant_key: tenant_key(params)?,
            status: optional_str(params, "status")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDraftArgs {
    pub tenant_key: String,
    pub title: String,
    pub content: String,
}

impl CreateDraftArgs {
    pub fn from_params(params: &serde_json::Map<String, JsonValue>) -> Result<Self, String> {
        Ok(Self {
            tenant_key: tenant_key(params)?,
            title: required_str(params, "title")?,
            content: required_str(params, "content")?,
        })
    }
}

fn tenant_key(params: &serde_json::Map<String, JsonValue>) -> Result<String, String> {
    let mut found = None;
    for name in TENANT_KEYS {
        if let Some(key) = optional_str(params, name)? {
            found = Some(key);
            break;
        }
    }
    let key = found.ok_or_else(|| "missing required field: tenantKey".to_string())?;
    if key.is_empty() {
        return Err("tenantKey must not be empty".into());
    }
    Ok(key)
}

fn required_str(params: &serde_json::Map<String, JsonValue>, field: &str) -> Result<String, String> {
    params
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| format!("missing required field: {field}"))
}

fn optional_str(
    params: &serde_json::Map<String, JsonValue>,
    field: &str,
) -> Result<Option<String>, String> {
    match params.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("field '{field}' must be a string")),
    }
}

/// The MCP server handler: tenant table plus the upstream executor.
#[derive(Clone)]
pub struct PostsSvc {
    tenants: TenantRegistry,
    upstream: Arc<dyn Upstream>,
}

impl PostsSvc {
    pub fn new(tenants: TenantRegistry, upstream: Arc<dyn Upstream>) -> Self {
        Self { tenants, upstream }
    }

    pub fn tenants(&self) -> &TenantRegistry {
        &self.tenants
    }

    /// `GET {base}/wp/v2/posts[?status=..]`
    pub async fn list_posts(&self, args: ListPostsArgs) -> ResultEnvelope {
        let tenant = match self.tenants.resolve(&args.tenant_key) {
            Ok(t) => t,
            Err(e) => return ResultEnvelope::error(e.to_string()),
        };
        let query: Vec<(&str, &str)> = args
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| vec![("status", s)])
            .unwrap_or_default();
        tracing::debug!(tenant = %args.tenant_key, status = ?args.status, "list_posts");

        match build(tenant, Method::GET, POSTS_PATH, &query, None) {
            Ok(request) => label(self.upstream.execute(request).await, "", LIST_ERROR_PREFIX),
            Err(e) => ResultEnvelope::error(format!("{LIST_ERROR_PREFIX}{e}")),
        }
    }

    /// `POST {base}/wp/v2/posts` with `status: "draft"` fixed.
    pub async fn create_draft_post(&self, args: CreateDraftArgs) -> ResultEnvelope {
        let tenant = match self.tenants.resolve(&args.tenant_key) {
            Ok(t) => t,
            Err(e) => return ResultEnvelope::error(e.to_string()),
        };
        tracing::debug!(tenant = %args.tenant_key, "create_draft_post");

        let body = match serde_json::to_value(NewPost::draft(args.title, args.content)) {
            Ok(v) => v,
            Err(e) => return ResultEnvelope::error(format!("{CREATE_ERROR_PREFIX}{e}")),
        };
        match build(tenant, Method::POST, POSTS_PATH, &[], Some(body)) {
            Ok(request) => label(
                self.upstream.execute(request).await,
                CREATE_SUCCESS_PREFIX,
                CREATE_ERROR_PREFIX,
            ),
            Err(e) => ResultEnvelope::error(format!("{CREATE_ERROR_PREFIX}{e}")),
        }
    }
}

fn label(env: ResultEnvelope, ok_prefix: &str, err_prefix: &str) -> ResultEnvelope {
    if env.is_error {
        env.prefixed(err_prefix)
    } else {
        env.prefixed(ok_prefix)
    }
}
