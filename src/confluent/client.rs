//! Confluent Cloud Client
//!
//! Binds the immutable configuration to the HTTP gateway: builds URLs for
//! each API surface and picks the matching credentials.

use super::http::HttpGateway;
use super::{FetchFailed, Fetched};
use crate::config::Config;
use anyhow::Result;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Arc;

/// Upper bound on `metadata.next` links followed for one listing
pub const MAX_PAGES: usize = 100;

/// The two REST surfaces, each with its own API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    /// Organization-level API: environments, compute pools
    ControlPlane,
    /// Regional Flink SQL API: statements
    FlinkSql,
}

/// Main Confluent Cloud client
#[derive(Debug, Clone)]
pub struct ConfluentClient {
    config: Arc<Config>,
    pub http: HttpGateway,
    cloud_headers: HeaderMap,
    flink_headers: HeaderMap,
}

impl ConfluentClient {
    pub fn new(config: Config) -> Self {
        Self::with_gateway(config, HttpGateway::new())
    }

    pub fn with_gateway(config: Config, http: HttpGateway) -> Self {
        let cloud_headers = config.cloud_credentials.headers();
        let flink_headers = config.flink_credentials.headers();

        Self {
            config: Arc::new(config),
            http,
            cloud_headers,
            flink_headers,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn headers(&self, api: Api) -> &HeaderMap {
        match api {
            Api::ControlPlane => &self.cloud_headers,
            Api::FlinkSql => &self.flink_headers,
        }
    }

    /// Make a GET request against one API surface
    pub async fn get(&self, api: Api, url: &str) -> Result<Value> {
        self.http.get(url, self.headers(api)).await
    }

    /// Make a POST request against one API surface
    pub async fn post(&self, api: Api, url: &str, body: &Value) -> Result<Value> {
        self.http.post(url, self.headers(api), body).await
    }

    /// Fetch a single resource document.
    /// A failed call or an empty document both come back as `FetchFailed`.
    pub async fn get_document(&self, api: Api, url: &str) -> Fetched<Value> {
        match self.get(api, url).await {
            Ok(doc) if has_content(&doc) => Ok(doc),
            _ => Err(FetchFailed {
                url: url.to_string(),
            }),
        }
    }

    /// Fetch every item of a collection, following `metadata.next` links.
    /// Any failed page fails the whole listing with that page's URL.
    pub async fn get_collection(&self, api: Api, url: &str) -> Fetched<Vec<Value>> {
        let mut items = Vec::new();
        let mut page_url = url.to_string();

        for page in 1..=MAX_PAGES {
            let doc = match self.get(api, &page_url).await {
                Ok(doc) if has_content(&doc) => doc,
                _ => return Err(FetchFailed { url: page_url }),
            };

            if let Some(data) = doc.get("data").and_then(|v| v.as_array()) {
                items.extend(data.iter().cloned());
            }

            match next_page_url(&page_url, &doc) {
                Some(next) if next != page_url => page_url = next,
                _ => return Ok(items),
            }

            if page == MAX_PAGES {
                tracing::warn!("Stopped after {} pages of {}", MAX_PAGES, url);
            }
        }

        Ok(items)
    }

    // =========================================================================
    // Control plane URL helpers
    // =========================================================================

    /// Build control plane URL
    pub fn control_plane_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.control_plane_endpoint(), path)
    }

    /// Build environments listing URL
    pub fn environments_url(&self) -> String {
        self.control_plane_url("org/v2/environments")
    }

    /// Build compute pool listing URL for an environment
    pub fn compute_pools_url(&self, env: &str) -> String {
        let url = self.control_plane_url("fcpm/v2/compute-pools");
        with_environment_query(&url, env)
    }

    /// Build single compute pool URL
    pub fn compute_pool_url(&self, env: &str, pool: &str) -> String {
        let url = self.control_plane_url(&format!("fcpm/v2/compute-pools/{}", encode(pool)));
        with_environment_query(&url, env)
    }

    // =========================================================================
    // Flink SQL URL helpers
    // =========================================================================

    /// Build organization-scoped environments URL on the Flink SQL API
    pub fn flink_environments_url(&self) -> String {
        format!(
            "{}/sql/v1/organizations/{}/environments",
            self.config.flink_endpoint(),
            encode(&self.config.org_id)
        )
    }

    /// Build statement listing URL for an environment
    pub fn statements_url(&self, env: &str) -> String {
        format!("{}/{}/statements", self.flink_environments_url(), encode(env))
    }

    /// Build single statement URL
    pub fn statement_url(&self, env: &str, statement: &str) -> String {
        format!("{}/{}", self.statements_url(env), encode(statement))
    }
}

/// An empty document carries no data, the same as a failed call
pub(crate) fn has_content(doc: &Value) -> bool {
    match doc {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn with_environment_query(url: &str, env: &str) -> String {
    match url::Url::parse_with_params(url, &[("environment", env)]) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => format!("{}?environment={}", url, encode(env)),
    }
}

/// Resolve the next page link (absolute or relative to the current page)
fn next_page_url(current: &str, doc: &Value) -> Option<String> {
    let next = doc
        .get("metadata")
        .and_then(|m| m.get("next"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?;

    match url::Url::parse(current).and_then(|base| base.join(next)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Some(next.to_string()),
    }
}
