//! Correlation headers sent with every WordPress REST call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::RequestBuilder;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// `wpgw-<unix secs>-<sequence>`; the sequence keeps concurrent calls distinct.
pub fn generate_request_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("wpgw-{secs}-{seq}")
}

fn user_agent() -> String {
    format!("wordpress-mcp-gateway/{}", env!("CARGO_PKG_VERSION"))
}

/// Tag an upstream request with a request id, user agent and JSON `Accept`.
/// Returns the builder and the id used.
pub fn add_standard_headers(
    builder: RequestBuilder,
    request_id: Option<String>,
) -> (RequestBuilder, String) {
    let rid = request_id.unwrap_or_else(generate_request_id);
    let b = builder
        .header(REQUEST_ID_HEADER, rid.as_str())
        .header(USER_AGENT, user_agent())
        .header(ACCEPT, "application/json");
    (b, rid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_prefixed_and_distinct() {
        let a = generate_request_id();
        let b = generate_request_id();
        assert!(a.starts_with("wpgw-"));
        assert_ne!(a, b);
    }

    #[test]
    fn keeps_supplied_request_id() {
        let client = reqwest::Client::new();
        let (builder, rid) =
            add_standard_headers(client.get("http://localhost/wp/v2/posts"), Some("rid-1".into()));
        assert_eq!(rid, "rid-1");
        let req = builder.build().unwrap();
        assert_eq!(req.headers()[REQUEST_ID_HEADER], "rid-1");
        assert_eq!(req.headers()["accept"], "application/json");
        assert!(req.headers()["user-agent"]
            .to_str()
            .unwrap()
            .starts_with("wordpress-mcp-gateway/"));
    }
}
