use thiserror::Error;

/// Every way a tool call can fail inside the gateway pipeline.
///
/// None of these escape a tool call: the orchestration layer folds them into
/// an error [`ResultEnvelope`](crate::core::envelope::ResultEnvelope).
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Tenant '{0}' not found")]
    TenantNotFound(String),

    #[error("{0}")]
    Transport(String),

    #[error("upstream did not respond within {0}ms")]
    Timeout(u64),

    #[error("upstream returned {status} with a body that is not valid JSON: {snippet}")]
    UpstreamBodyUnparseable { status: u16, snippet: String },

    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("credential for {0} is not a valid header value")]
    InvalidCredential(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        // Display alone is just "error sending request"; append the source chain.
        let mut msg = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            msg.push_str(": ");
            msg.push_str(&inner.to_string());
            source = inner.source();
        }
        GatewayError::Transport(msg)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_not_found_names_the_key() {
        let e = GatewayError::TenantNotFound("acme".into());
        assert_eq!(e.to_string(), "Tenant 'acme' not found");
    }

    #[test]
    fn status_error_carries_code_and_body() {
        let e = GatewayError::UpstreamStatus {
            status: 401,
            body: "{\"code\":\"rest_forbidden\"}".into(),
        };
        let s = e.to_string();
        assert!(s.contains("401"));
        assert!(s.contains("rest_forbidden"));
    }
}
