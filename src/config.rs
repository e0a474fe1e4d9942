//! Configuration Management
//!
//! Settings for the Confluent Cloud organization and the two API key pairs.
//! Loaded once at startup from an optional JSON file and then overridden by
//! CLI flags / environment variables. Never mutated afterwards.

use crate::confluent::auth::Credentials;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CLOUD_PROVIDER: &str = "aws";
pub const DEFAULT_CLOUD_REGION: &str = "eu-central-1";
pub const DEFAULT_CONTROL_PLANE_ENDPOINT: &str = "https://api.confluent.cloud";

/// Process-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Confluent Cloud organization ID
    pub org_id: String,
    pub cloud_provider: String,
    pub cloud_region: String,
    /// Principal (service account) that submitted statements run as
    pub principal_id: String,
    /// Cloud API key, used for environments and compute pools
    pub cloud_credentials: Credentials,
    /// Flink API key, used for statements
    pub flink_credentials: Credentials,
    /// Override for the control plane base URL
    pub control_plane_endpoint: Option<String>,
    /// Override for the regional Flink SQL base URL
    pub flink_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org_id: String::new(),
            cloud_provider: DEFAULT_CLOUD_PROVIDER.to_string(),
            cloud_region: DEFAULT_CLOUD_REGION.to_string(),
            principal_id: String::new(),
            cloud_credentials: Credentials::default(),
            flink_credentials: Credentials::default(),
            control_plane_endpoint: None,
            flink_endpoint: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
/// Every field set here wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub org_id: Option<String>,
    pub cloud_provider: Option<String>,
    pub cloud_region: Option<String>,
    pub principal_id: Option<String>,
    pub cloud_api_key: Option<String>,
    pub cloud_api_secret: Option<String>,
    pub flink_api_key: Option<String>,
    pub flink_api_secret: Option<String>,
    pub control_plane_endpoint: Option<String>,
    pub flink_endpoint: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flink-mcp").join("config.json"))
    }

    /// Load configuration from disk.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is used if present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply CLI/env overrides (CLI > config > default)
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        fn apply(target: &mut String, value: Option<String>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        apply(&mut self.org_id, overrides.org_id);
        apply(&mut self.cloud_provider, overrides.cloud_provider);
        apply(&mut self.cloud_region, overrides.cloud_region);
        apply(&mut self.principal_id, overrides.principal_id);
        apply(&mut self.cloud_credentials.key, overrides.cloud_api_key);
        apply(&mut self.cloud_credentials.secret, overrides.cloud_api_secret);
        apply(&mut self.flink_credentials.key, overrides.flink_api_key);
        apply(&mut self.flink_credentials.secret, overrides.flink_api_secret);

        if overrides.control_plane_endpoint.is_some() {
            self.control_plane_endpoint = overrides.control_plane_endpoint;
        }
        if overrides.flink_endpoint.is_some() {
            self.flink_endpoint = overrides.flink_endpoint;
        }

        self
    }

    /// Log the gaps that will make remote calls fail.
    /// Startup continues; the API rejects the calls and tools report it.
    pub fn warn_if_incomplete(&self) {
        if self.org_id.is_empty() {
            tracing::warn!("No organization ID configured, Flink statement URLs will be invalid");
        }
        if self.principal_id.is_empty() {
            tracing::warn!("No principal ID configured, statement submission will be rejected");
        }
        if self.cloud_credentials.is_incomplete() {
            tracing::warn!("Cloud API key/secret incomplete");
        }
        if self.flink_credentials.is_incomplete() {
            tracing::warn!("Flink API key/secret incomplete");
        }
    }

    /// Control plane base URL, without trailing slash
    pub fn control_plane_endpoint(&self) -> String {
        self.control_plane_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_CONTROL_PLANE_ENDPOINT)
            .trim_end_matches('/')
            .to_string()
    }

    /// Regional Flink SQL base URL, without trailing slash
    pub fn flink_endpoint(&self) -> String {
        match self.flink_endpoint.as_deref() {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://flink.{}.{}.confluent.cloud",
                self.cloud_region, self.cloud_provider
            ),
        }
    }
}
