use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;

use crate::clients::request::UpstreamRequest;
use crate::core::envelope::ResultEnvelope;
use crate::core::error::{GatewayError, Result};
use crate::infra::config::{StatusPolicy, UpstreamSettings};
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

const SNIPPET_CHARS: usize = 512;

/// Executes one upstream request and folds the outcome into an envelope.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    async fn execute(&self, request: UpstreamRequest) -> ResultEnvelope;
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    timeout: Duration,
    status_policy: StatusPolicy,
}

impl UpstreamClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self> {
        Ok(Self::with_client(make_http_client(settings)?, settings))
    }

    pub fn with_client(http: Client, settings: &UpstreamSettings) -> Self {
        Self {
            http,
            timeout: settings.timeout(),
            status_policy: settings.status_policy,
        }
    }

    /// Run the round trip under the configured deadline and return the parsed body.
    ///
    /// Dropping the returned future aborts the in-flight request.
    pub async fn send(&self, request: UpstreamRequest) -> Result<JsonValue> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let host = request.url.host_str().unwrap_or_default().to_owned();
        let start = Instant::now();
        let res = match tokio::time::timeout(self.timeout, self.round_trip(request)).await {
            Ok(res) => res,
            Err(_) => Err(GatewayError::Timeout(timeout_ms)),
        };
        let res = res.and_then(|(status, bytes)| classify(self.status_policy, status, &bytes));
        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_millis() as f64;
                crate::infra::logging::log_metric("latency_ms", &host, elapsed_ms);
            }
            Err(e) => {
                tracing::warn!(upstream = %host, error = %e, "upstream call failed");
                crate::infra::logging::log_metric("error_total", &host, 1.0);
            }
        }
        res
    }

    async fn round_trip(&self, request: UpstreamRequest) -> Result<(StatusCode, Vec<u8>)> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let UpstreamRequest {
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!(method = %method, host = url.host_str().unwrap_or(""), path = url.path(), "upstream request");

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = &body {
            builder = builder.json(body);
        }
        let (builder, rid) = add_standard_headers(builder, None);

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                GatewayError::Timeout(timeout_ms)
            } else {
                GatewayError::from(e)
            }
        };
        let resp = builder.send().await.map_err(map_err)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(map_err)?;
        tracing::debug!(request_id = %rid, status = status.as_u16(), bytes = bytes.len(), "upstream response");
        Ok((status, bytes.to_vec()))
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn execute(&self, request: UpstreamRequest) -> ResultEnvelope {
        normalize(self.send(request).await)
    }
}

/// Decide whether a received response is surfaced as content or as a failure.
pub fn classify(policy: StatusPolicy, status: StatusCode, bytes: &[u8]) -> Result<JsonValue> {
    let parsed = serde_json::from_slice::<JsonValue>(bytes);
    match (policy, status.is_success(), parsed) {
        (_, true, Ok(body)) | (StatusPolicy::Passthrough, false, Ok(body)) => Ok(body),
        (StatusPolicy::Strict, false, Ok(body)) => Err(GatewayError::UpstreamStatus {
            status: status.as_u16(),
            body: pretty(&body),
        }),
        (StatusPolicy::Strict, false, Err(_)) => Err(GatewayError::UpstreamStatus {
            status: status.as_u16(),
            body: snippet(bytes),
        }),
        (_, _, Err(_)) => Err(GatewayError::UpstreamBodyUnparseable {
            status: status.as_u16(),
            snippet: snippet(bytes),
        }),
    }
}

pub fn normalize(outcome: Result<JsonValue>) -> ResultEnvelope {
    match outcome {
        Ok(body) => ResultEnvelope::success(pretty(&body)),
        Err(e) => ResultEnvelope::error(e.to_string()),
    }
}

fn pretty(v: &JsonValue) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn snippet(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut out: String = text.chars().take(SNIPPET_CHARS).collect();
    if text.chars().count() > SNIPPET_CHARS {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::request::build;
    use crate::domain::TenantConfig;
    use httpmock::prelude::*;
    use reqwest::Method;
    use serde_json::json;

    fn client(policy: StatusPolicy, timeout_ms: u64) -> UpstreamClient {
        UpstreamClient::new(&UpstreamSettings {
            timeout_ms,
            connect_timeout_ms: 500,
            status_policy: policy,
        })
        .unwrap()
    }

    fn get_posts(base: String) -> UpstreamRequest {
        build(&TenantConfig::new(base, "tok"), Method::GET, "wp/v2/posts", &[], None).unwrap()
    }

    #[tokio::test]
    async fn success_is_pretty_printed_json() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/wp/v2/posts")
                .header("authorization", "Bearer tok")
                .header_exists("x-request-id")
                .header_exists("user-agent");
            then.status(200).json_body(json!({"id":1,"title":"x"}));
        });

        let env = client(StatusPolicy::Strict, 2_000)
            .execute(get_posts(server.base_url()))
            .await;
        m.assert();
        assert!(!env.is_error);
        assert_eq!(
            env.text(),
            serde_json::to_string_pretty(&json!({"id":1,"title":"x"})).unwrap()
        );
    }

    #[tokio::test]
    async fn strict_policy_flags_non_2xx() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wp/v2/posts");
            then.status(401)
                .json_body(json!({"code":"rest_forbidden","message":"Sorry"}));
        });

        let env = client(StatusPolicy::Strict, 2_000)
            .execute(get_posts(server.base_url()))
            .await;
        assert!(env.is_error);
        assert!(env.text().contains("401"));
        assert!(env.text().contains("rest_forbidden"));
    }

    #[tokio::test]
    async fn strict_policy_flags_non_2xx_with_html_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wp/v2/posts");
            then.status(502).body("<html>Bad Gateway</html>");
        });

        let env = client(StatusPolicy::Strict, 2_000)
            .execute(get_posts(server.base_url()))
            .await;
        assert!(env.is_error);
        assert!(env.text().contains("502"));
        assert!(env.text().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn passthrough_policy_surfaces_error_bodies_as_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wp/v2/posts");
            then.status(404).json_body(json!({"code":"rest_no_route"}));
        });

        let env = client(StatusPolicy::Passthrough, 2_000)
            .execute(get_posts(server.base_url()))
            .await;
        assert!(!env.is_error);
        assert!(env.text().contains("rest_no_route"));
    }

    #[tokio::test]
    async fn non_json_success_body_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wp/v2/posts");
            then.status(200).body("definitely not json");
        });

        let env = client(StatusPolicy::Passthrough, 2_000)
            .execute(get_posts(server.base_url()))
            .await;
        assert!(env.is_error);
        assert!(env.text().contains("not valid JSON"));
        assert!(env.text().contains("definitely not json"));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let env = client(StatusPolicy::Strict, 2_000)
            .execute(get_posts("http://127.0.0.1:1".into()))
            .await;
        assert!(env.is_error);
        assert!(!env.text().is_empty());
    }

    #[tokio::test]
    async fn slow_upstream_hits_the_deadline() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wp/v2/posts");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!([]));
        });

        let env = client(StatusPolicy::Strict, 150)
            .execute(get_posts(server.base_url()))
            .await;
        assert!(env.is_error);
        assert!(env.text().contains("150ms"), "got: {}", env.text());
    }

    #[tokio::test]
    async fn sends_json_body_for_post() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/wp/v2/posts")
                .header("content-type", "application/json")
                .json_body(json!({"title":"t","content":"c","status":"draft"}));
            then.status(201).json_body(json!({"id":7}));
        });

        let req = build(
            &TenantConfig::new(server.base_url(), "tok"),
            Method::POST,
            "wp/v2/posts",
            &[],
            Some(json!({"title":"t","content":"c","status":"draft"})),
        )
        .unwrap();
        let env = client(StatusPolicy::Strict, 2_000).execute(req).await;
        m.assert();
        assert!(!env.is_error);
        assert!(env.text().contains("\"id\": 7"));
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(SNIPPET_CHARS + 10);
        let s = snippet(long.as_bytes());
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 1);
        assert!(s.ends_with('…'));
    }
}
