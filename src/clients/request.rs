use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value as JsonValue;

use crate::core::error::{GatewayError, Result};
use crate::domain::TenantConfig;

/// A fully-resolved outbound call. Built fresh for every tool invocation.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<JsonValue>,
}

impl UpstreamRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Build an authenticated JSON request for `resource_path` under the tenant's base URL.
///
/// The query string is only set when `query` is non-empty. `body` is dropped for
/// methods that do not carry one (GET, HEAD, DELETE, OPTIONS).
pub fn build(
    config: &TenantConfig,
    method: Method,
    resource_path: &str,
    query: &[(&str, &str)],
    body: Option<JsonValue>,
) -> Result<UpstreamRequest> {
    let raw = format!(
        "{}/{}",
        config.base_url.trim_end_matches('/'),
        resource_path.trim_start_matches('/')
    );
    let mut url = Url::parse(&raw).map_err(|e| GatewayError::InvalidBaseUrl {
        url: config.base_url.clone(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: "expected an absolute http(s) URL".into(),
        });
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter().copied());
    }

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.credential))
        .map_err(|_| GatewayError::InvalidCredential(config.base_url.clone()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let body = if carries_body(&method) { body } else { None };

    Ok(UpstreamRequest {
        method,
        url,
        headers,
        body,
    })
}

fn carries_body(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::DELETE | Method::OPTIONS
    )
}
