//! Configuration management
//!
//! Loads configuration from config.toml with support for:
//! - Tenant identifier scoping all document paths
//! - Document store and auth gateway endpoints
//! - Store refresh interval for the REST watchers
//!
//! Hosting-provided environment variables take precedence over the file;
//! the embedded default is the static fallback.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tenant: TenantConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Logical partition for all document paths (`tenant/{id}/...`).
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    /// Seconds between collection refreshes for REST store watchers.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

fn default_refresh_secs() -> u64 {
    2
}

impl Config {
    /// Load from config.toml or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load from specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            // Use embedded default config
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse default config")
        }
    }

    /// Tenant id (env var takes precedence)
    pub fn tenant_id(&self) -> String {
        match std::env::var("INTERN_TENANT_ID") {
            Ok(id) if !id.is_empty() => id,
            _ => self.tenant.id.clone(),
        }
    }

    /// Document store endpoint (env var takes precedence)
    pub fn store_url(&self) -> String {
        match std::env::var("INTERN_STORE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => self.store.base_url.clone(),
        }
    }

    /// Auth gateway endpoint (env var takes precedence)
    pub fn auth_url(&self) -> String {
        match std::env::var("INTERN_AUTH_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => self.auth.base_url.clone(),
        }
    }

    /// Auth gateway API key (env var takes precedence)
    pub fn auth_api_key(&self) -> String {
        match std::env::var("INTERN_AUTH_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => self.auth.api_key.clone(),
        }
    }

    /// Pre-provisioned session token, if the hosting environment set one.
    /// Used once at startup for silent sign-in.
    pub fn session_token(&self) -> Option<String> {
        std::env::var("INTERN_SESSION_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
    }

    pub fn store_refresh(&self) -> Duration {
        Duration::from_secs(self.store.refresh_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded default config is validated at compile time,
        // so this should never fail. Using a fallback for robustness.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            tenant: TenantConfig {
                id: "intern-dashboard".to_string(),
            },
            store: StoreConfig {
                base_url: "https://store.intern-rewards.dev".to_string(),
                refresh_secs: default_refresh_secs(),
            },
            auth: AuthConfig {
                base_url: "https://auth.intern-rewards.dev".to_string(),
                api_key: String::new(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses() {
        let config = Config::default();
        assert_eq!(config.tenant.id, "intern-dashboard");
        assert!(config.store.refresh_secs >= 1);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = Config::load_from("/nonexistent/config.toml").unwrap();
        assert_eq!(config.tenant.id, "intern-dashboard");
    }
}
