//! Transport error types.

use thiserror::Error;

// ============================================================================
// Transport Error
// ============================================================================

/// Failure of a single upstream invocation.
///
/// This is the only error shape the resilient call wrapper inspects; it never
/// looks at provider schemas.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Upstream answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Reason phrase or body snippet.
        message: String,
    },

    /// Connection, timeout, or other I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Response body did not match the expected schema.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Anything else (bad request construction, blocked domain, ...).
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Creates an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classifies this failure for retry purposes.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Http { status: 403 | 429, .. } => ErrorClass::RateLimited,
            Self::Http { .. } | Self::Io(_) => ErrorClass::TransientTransport,
            Self::Decode(_) | Self::Other(_) => ErrorClass::NonRetryable,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::http(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            return Self::Io(err.to_string());
        }
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// ============================================================================
// Error Class
// ============================================================================

/// How the resilient call wrapper treats a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 403/429: terminal, retrying cannot succeed.
    RateLimited,
    /// Generic I/O or other HTTP status: retried up to the limit.
    TransientTransport,
    /// Any other failure: terminal immediately.
    NonRetryable,
}

// ============================================================================
// Tests
// ============================================================================
