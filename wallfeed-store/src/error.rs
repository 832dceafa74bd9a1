//! Store error types.

use thiserror::Error;
use wallfeed_core::CoreError;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No adapter is registered for the provider.
    #[error("Provider not available: {0}")]
    ProviderUnavailable(String),

    /// Remote fetch raised instead of returning an outcome.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Cache read or write failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Core model error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::FetchFailed(_) | StoreError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::FetchFailed("x".into()).is_transient());
        assert!(StoreError::Io(std::io::Error::other("disk")).is_transient());
        assert!(!StoreError::Config("bad".into()).is_transient());
        assert!(!StoreError::Cache("full".into()).is_transient());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: StoreError = CoreError::InvalidConfig("quota is zero".into()).into();
        assert_eq!(err.to_string(), "Invalid configuration: quota is zero");
    }
}
