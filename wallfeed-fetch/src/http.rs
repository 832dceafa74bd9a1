//! HTTP transport with tracing and a domain allowlist.
//!
//! Adapters never talk to `reqwest` directly; they build a [`Request`] and
//! hand it to a [`Transport`]. Tests substitute a scripted transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::TransportError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent string for Wallfeed.
const USER_AGENT: &str = concat!("Wallfeed/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt kept in an HTTP error message.
const ERROR_BODY_LIMIT: usize = 200;

// ============================================================================
// Request
// ============================================================================

/// A GET request against an upstream JSON API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Appends a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of a query parameter, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header, if set.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Performs upstream requests.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends `request` and returns the decoded JSON body.
    ///
    /// Non-2xx responses come back as [`TransportError::Http`].
    async fn get_json(&self, request: &Request) -> Result<Value, TransportError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom timeout.
    ///
    /// Fails only when the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    fn is_domain_allowed(&self, url: &str) -> Result<(), TransportError> {
        let parsed =
            Url::parse(url).map_err(|e| TransportError::Other(format!("invalid URL: {e}")))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| TransportError::Other("no host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(TransportError::Other(format!("domain not allowed: {host}")))
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn get_json(&self, request: &Request) -> Result<Value, TransportError> {
        self.is_domain_allowed(&request.url)?;
        debug!("GET request");

        let mut builder = self.inner.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(status = %status, "Response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.chars().take(ERROR_BODY_LIMIT).collect()
            };
            return Err(TransportError::http(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::new()
            .unwrap()
            .with_allowed_domains(vec!["unsplash.com".to_string(), "pexels.com".to_string()]);

        assert!(client.is_domain_allowed("https://api.unsplash.com/photos").is_ok());
        assert!(client.is_domain_allowed("https://api.pexels.com/v1/curated").is_ok());
        assert!(client.is_domain_allowed("https://pexels.com").is_ok());
        assert!(client.is_domain_allowed("https://evil.com/steal").is_err());
        assert!(client.is_domain_allowed("https://notpexels.com").is_err());
    }

    #[test]
    fn test_invalid_url_is_not_retryable() {
        let client = HttpClient::new().unwrap();
        let err = client.is_domain_allowed("not-a-valid-url").unwrap_err();
        assert_eq!(err.class(), crate::ErrorClass::NonRetryable);
    }

    #[test]
    fn test_request_builder() {
        let req = Request::get("https://pixabay.com/api/")
            .query("page", 2)
            .query_opt("q", Some("forest"))
            .query_opt("order", None::<&str>)
            .header("Authorization", "key");

        assert_eq!(req.query_value("page"), Some("2"));
        assert_eq!(req.query_value("q"), Some("forest"));
        assert_eq!(req.query_value("order"), None);
        assert_eq!(req.header_value("authorization"), Some("key"));
    }
}
