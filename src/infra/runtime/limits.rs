use crate::core::error::{GatewayError, Result};
use crate::infra::config::UpstreamSettings;

/// Shared upstream HTTP client: connect timeout, overall deadline, no redirects.
pub fn make_http_client(settings: &UpstreamSettings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout())
        .timeout(settings.timeout())
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| GatewayError::Config(format!("building HTTP client: {e}")))
}
