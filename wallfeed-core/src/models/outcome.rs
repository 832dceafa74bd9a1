//! Call outcome types.
//!
//! Every upstream call, adapter operation, and reconciler emission resolves
//! to a [`CallOutcome`]. Failures are values, never panics.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::provider::ProviderId;

// ============================================================================
// Provider Error
// ============================================================================

/// Failure payload of [`CallOutcome::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    /// HTTP-style status code, when the failure carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message.
    pub message: String,
    /// Provider the failure is attributed to.
    pub provider: ProviderId,
}

impl ProviderError {
    /// Creates an error without a status code.
    pub fn new(provider: ProviderId, message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            provider,
        }
    }

    /// Creates an error carrying a status code.
    pub fn with_code(provider: ProviderId, code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            provider,
        }
    }

    /// True for provider-side throttling (403 / 429).
    ///
    /// Callers show "try later" for these rather than a generic failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.code, Some(403 | 429))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} [{}]: {}", self.provider, code, self.message),
            None => write!(f, "{}: {}", self.provider, self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

// ============================================================================
// Call Outcome
// ============================================================================

/// Result of an upstream call or a reconciler state snapshot.
///
/// `Loading` is transient: it is emitted by the reconciler while nothing is
/// cached, and is never returned by a terminal call nor persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum CallOutcome<T> {
    /// The call produced a value.
    Success(T),
    /// The call failed.
    Error(ProviderError),
    /// No value yet.
    Loading,
}

impl<T> CallOutcome<T> {
    /// Shorthand for an error outcome without a status code.
    pub fn error(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::Error(ProviderError::new(provider, message))
    }

    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for `Error`.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns true for anything but `Loading`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Borrows the success value.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrows the error payload.
    pub fn failure(&self) -> Option<&ProviderError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the success value.
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the success value, passing `Error` and `Loading` through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CallOutcome<U> {
        match self {
            Self::Success(value) => CallOutcome::Success(f(value)),
            Self::Error(err) => CallOutcome::Error(err),
            Self::Loading => CallOutcome::Loading,
        }
    }

    /// Borrowing view of the outcome.
    pub fn as_ref(&self) -> CallOutcome<&T> {
        match self {
            Self::Success(value) => CallOutcome::Success(value),
            Self::Error(err) => CallOutcome::Error(err.clone()),
            Self::Loading => CallOutcome::Loading,
        }
    }

    /// Converts into a `Result`. `Loading` becomes `None`.
    pub fn into_result(self) -> Option<Result<T, ProviderError>> {
        match self {
            Self::Success(value) => Some(Ok(value)),
            Self::Error(err) => Some(Err(err)),
            Self::Loading => None,
        }
    }
}

impl<T> From<ProviderError> for CallOutcome<T> {
    fn from(err: ProviderError) -> Self {
        Self::Error(err)
    }
}

// ============================================================================
// Tests
// ============================================================================
