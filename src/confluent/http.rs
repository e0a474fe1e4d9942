//! HTTP utilities for Confluent Cloud REST API calls

use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Every call gives up after this long
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("flink-mcp/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP gateway for Confluent Cloud API calls.
///
/// A fresh client is built for each call, so nothing is pooled between
/// requests. Any failure (transport, non-2xx, bad JSON) is logged here and
/// returned as a plain error; callers don't distinguish the cause.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    timeout: Duration,
}

impl HttpGateway {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, headers: &HeaderMap) -> Result<Value> {
        tracing::debug!("GET {}", url);
        log_failure("GET", url, self.send_get(url, headers).await)
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);
        log_failure("POST", url, self.send_post(url, headers, body).await)
    }

    async fn send_get(&self, url: &str, headers: &HeaderMap) -> Result<Value> {
        let response = self
            .client()?
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .context("Failed to send request")?;

        read_json(response).await
    }

    async fn send_post(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<Value> {
        let response = self
            .client()?
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        read_json(response).await
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
        tracing::debug!("API error body: {}", sanitize_for_log(&body));
        return Err(anyhow::anyhow!("API request failed: {}", status));
    }

    // Handle empty response
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).context("Failed to parse response JSON")
}

fn log_failure(method: &str, url: &str, result: Result<Value>) -> Result<Value> {
    if let Err(e) = &result {
        tracing::error!("Error making request: {} {}: {:#}", method, url, e);
    }
    result
}
