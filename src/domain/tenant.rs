use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{GatewayError, Result};

/// Connection info for one tenant's upstream site.
#[derive(Clone, PartialEq, Eq)]
pub struct TenantConfig {
    pub base_url: String,
    pub credential: String,
}

impl TenantConfig {
    pub fn new(base_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: credential.into(),
        }
    }
}

impl fmt::Debug for TenantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantConfig")
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Read-only tenant table, built once at boot and shared by every tool call.
#[derive(Clone, Debug, Default)]
pub struct TenantRegistry {
    by_key: Arc<HashMap<String, TenantConfig>>,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenants<I, K>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, TenantConfig)>,
        K: Into<String>,
    {
        let map = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { by_key: Arc::new(map) }
    }

    /// Add a tenant while the registry is still being assembled.
    pub fn with_tenant(mut self, key: impl Into<String>, config: TenantConfig) -> Self {
        Arc::make_mut(&mut self.by_key).insert(key.into(), config);
        self
    }

    pub fn resolve(&self, key: &str) -> Result<&TenantConfig> {
        self.by_key
            .get(key)
            .ok_or_else(|| GatewayError::TenantNotFound(key.to_owned()))
    }

    /// Tenant keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
