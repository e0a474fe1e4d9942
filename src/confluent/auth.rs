//! Confluent Cloud Authentication
//!
//! API keys are plain key/secret pairs sent as HTTP basic auth. The control
//! plane and the Flink SQL API each take their own pair.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An API key/secret pair for one API surface
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// True when either half of the pair is missing
    pub fn is_incomplete(&self) -> bool {
        self.key.is_empty() || self.secret.is_empty()
    }

    /// base64("key:secret")
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.key, self.secret))
    }

    /// Headers sent with every call on this surface: basic auth and a JSON accept
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // base64 output is always a valid header value
        if let Ok(mut value) = HeaderValue::from_str(&format!("Basic {}", self.basic_token())) {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }
}

// Security: never print the secret, even in debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &if self.secret.is_empty() { "" } else { "***" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_token_encodes_key_and_secret() {
        let creds = Credentials::new("KEY", "SECRET");
        // echo -n 'KEY:SECRET' | base64
        assert_eq!(creds.basic_token(), "S0VZOlNFQ1JFVA==");
    }

    #[test]
    fn test_headers_carry_auth_and_accept() {
        let headers = Credentials::new("a", "b").headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic YTpi");
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", Credentials::new("visible-key", "hunter2"));
        assert!(rendered.contains("visible-key"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_is_incomplete() {
        assert!(Credentials::default().is_incomplete());
        assert!(Credentials::new("k", "").is_incomplete());
        assert!(!Credentials::new("k", "s").is_incomplete());
    }
}
