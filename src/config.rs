//! Server configuration.
//!
//! Settings are read from an optional JSON file and then overridden by
//! environment variables:
//! - `INCIDENT_DESK_ADMIN_TOKEN` - bearer token granting the admin role
//! - `INCIDENT_DESK_TENANT_TOKEN` - bearer token granting the tenant role
//! - `INCIDENT_DESK_CORS_ORIGINS` - allowed CORS origins, comma-separated
//! - `INCIDENT_DESK_RESOLVE_POLICY` - `lenient` (default) or `strict`
//! - `INCIDENT_DESK_PERMISSIVE_AUTH` - `true`/`1` treats every caller as admin

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::service::ResolvePolicy;

const APP_NAME: &str = "incident-desk";
const CONFIG_FILE: &str = "config.json";

/// Default port for `incident-desk serve`.
pub const DEFAULT_PORT: u16 = 17020;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bearer token that identifies admins. Without it nobody can resolve
    /// unless `permissive_auth` is set.
    pub admin_token: Option<String>,
    /// Bearer token that identifies tenants.
    pub tenant_token: Option<String>,
    /// Allowed CORS origins. `None` means permissive CORS.
    pub cors_origins: Option<Vec<String>>,
    pub resolve_policy: ResolvePolicy,
    /// Grant admin capability to every caller. Local demos only.
    pub permissive_auth: bool,
}

impl ServerConfig {
    /// Load from `path` (or the platform config file when `None`), then apply
    /// environment overrides. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let config = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Environment-only configuration.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup, so tests need not touch the
    /// process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("INCIDENT_DESK_ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
        if let Some(token) = lookup("INCIDENT_DESK_TENANT_TOKEN") {
            self.tenant_token = Some(token);
        }
        if let Some(origins) = lookup("INCIDENT_DESK_CORS_ORIGINS") {
            self.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        if let Some(policy) = lookup("INCIDENT_DESK_RESOLVE_POLICY") {
            self.resolve_policy = ResolvePolicy::from_str(policy.trim())
                .ok_or_else(|| anyhow::anyhow!("Invalid resolve policy: {}", policy))?;
        }
        if let Some(flag) = lookup("INCIDENT_DESK_PERMISSIVE_AUTH") {
            self.permissive_auth = matches!(flag.trim(), "1" | "true");
        }
        Ok(self)
    }

    /// Config with the given admin token and nothing else (for testing).
    pub fn with_admin_token(token: impl Into<String>) -> Self {
        Self {
            admin_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_tenant_token(mut self, token: impl Into<String>) -> Self {
        self.tenant_token = Some(token.into());
        self
    }

    pub fn with_resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.resolve_policy = policy;
        self
    }
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
