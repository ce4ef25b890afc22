use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{GatewayError, Result};
use crate::domain::{TenantConfig, TenantRegistry};

/// Process-level settings read from the environment.
pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub config_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let config_path = std::env::var("GATEWAY_CONFIG")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("gateway.toml"));

        Self {
            mode,
            port,
            config_path,
        }
    }
}

/// How upstream HTTP status codes map onto the envelope's `isError`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Any JSON body is surfaced as content, whatever the status.
    #[default]
    Passthrough,
    /// Non-2xx responses become error envelopes.
    Strict,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamSettings {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub status_policy: StatusPolicy,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: 2_000,
            status_policy: StatusPolicy::Passthrough,
        }
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantEntry {
    pub base_url: String,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub credential_env: Option<String>,
}

/// Contents of the gateway TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub upstream: UpstreamSettings,
    pub tenants: BTreeMap<String, TenantEntry>,
}

impl GatewayConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| GatewayError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Check everything that can be checked without network access.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.timeout_ms == 0 {
            return Err(GatewayError::Config("upstream.timeout_ms must be > 0".into()));
        }
        self.tenant_registry().map(|_| ())
    }

    /// Resolve every tenant entry (including `credential_env` lookups) into a registry.
    pub fn tenant_registry(&self) -> Result<TenantRegistry> {
        let mut tenants = Vec::with_capacity(self.tenants.len());
        for (key, entry) in &self.tenants {
            if key.trim().is_empty() {
                return Err(GatewayError::Config("tenant key must not be empty".into()));
            }
            check_base_url(key, &entry.base_url)?;
            let credential = resolve_credential(key, entry)?;
            tenants.push((key.clone(), TenantConfig::new(entry.base_url.clone(), credential)));
        }
        Ok(TenantRegistry::with_tenants(tenants))
    }
}

fn check_base_url(key: &str, base_url: &str) -> Result<()> {
    let url = reqwest::Url::parse(base_url).map_err(|e| {
        GatewayError::Config(format!("tenant '{key}': invalid base_url '{base_url}': {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::Config(format!(
            "tenant '{key}': base_url must be http(s), got '{}'",
            url.scheme()
        )));
    }
    Ok(())
}

fn resolve_credential(key: &str, entry: &TenantEntry) -> Result<String> {
    match (&entry.credential, &entry.credential_env) {
        (Some(c), None) if !c.is_empty() => Ok(c.clone()),
        (Some(_), None) => Err(GatewayError::Config(format!(
            "tenant '{key}': credential is empty"
        ))),
        (None, Some(var)) => match std::env::var(var) {
            Ok(v) if !v.is_empty() => Ok(v),
            _ => Err(GatewayError::Config(format!(
                "tenant '{key}': environment variable {var} is not set"
            ))),
        },
        (Some(_), Some(_)) => Err(GatewayError::Config(format!(
            "tenant '{key}': set only one of credential / credential_env"
        ))),
        (None, None) => Err(GatewayError::Config(format!(
            "tenant '{key}': missing credential or credential_env"
        ))),
    }
}
