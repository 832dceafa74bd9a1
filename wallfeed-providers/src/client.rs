//! Request plumbing shared by every adapter.
//!
//! An adapter builds a [`Request`], and [`ApiClient`] runs it through the
//! resilient caller tagged with the adapter's provider. Decoding into the
//! provider's native schema happens inside the wrapped operation, so a
//! schema mismatch surfaces as a non-retryable failure.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use wallfeed_core::{CallOutcome, ProviderError, ProviderId, SearchFilters, split_namespaced_id};
use wallfeed_fetch::{FetchContext, Request, ResilientCaller, Transport, TransportError};

// ============================================================================
// API Client
// ============================================================================

/// Transport plus resilient caller, bound to one provider.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    provider: ProviderId,
    transport: Arc<dyn Transport>,
    caller: ResilientCaller,
}

impl ApiClient {
    pub(crate) fn new(provider: ProviderId, ctx: &FetchContext) -> Self {
        Self {
            provider,
            transport: Arc::clone(&ctx.transport),
            caller: ctx.caller.clone(),
        }
    }

    /// Runs `request` and decodes the body as `T`.
    pub(crate) async fn fetch<T>(&self, request: Request) -> CallOutcome<T>
    where
        T: DeserializeOwned + Send,
    {
        let transport = &self.transport;
        let request = &request;
        self.caller
            .call_default(self.provider, move || async move {
                let body = transport.get_json(request).await?;
                Ok::<T, TransportError>(serde_json::from_value(body)?)
            })
            .await
    }

    /// Like [`fetch`](Self::fetch), but a 404 yields `Success(None)`.
    ///
    /// The 404 is absorbed inside the operation so it is neither retried
    /// nor counted as an error.
    pub(crate) async fn fetch_optional<T>(&self, request: Request) -> CallOutcome<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let transport = &self.transport;
        let request = &request;
        self.caller
            .call_default(self.provider, move || async move {
                match transport.get_json(request).await {
                    Ok(body) => Ok(Some(serde_json::from_value::<T>(body)?)),
                    Err(TransportError::Http { status: 404, .. }) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// Error outcome tagged with this client's provider, no request made.
    pub(crate) fn reject<T>(&self, message: impl Into<String>) -> CallOutcome<T> {
        CallOutcome::Error(ProviderError::new(self.provider, message))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Native id for `provider` from a namespaced or raw id.
///
/// `None` when the id is namespaced to a different provider.
pub(crate) fn own_native_id(provider: ProviderId, id: &str) -> Option<&str> {
    match split_namespaced_id(id) {
        Some((owner, native)) if owner == provider => Some(native),
        Some(_) => None,
        None => Some(id).filter(|id| !id.is_empty()),
    }
}

/// Copies the filters a provider understands onto the request.
pub(crate) fn apply_filters(mut request: Request, filters: &SearchFilters, allowed: &[&str]) -> Request {
    for (key, value) in filters {
        if allowed.contains(&key.as_str()) && !value.trim().is_empty() {
            request = request.query(key.as_str(), value.trim());
        }
    }
    request
}

/// Page number in `1..=span` derived from the clock.
///
/// Used by providers without a random endpoint.
pub(crate) fn clock_page(span: u32) -> u32 {
    Utc::now().timestamp_subsec_nanos() % span.max(1) + 1
}

// ============================================================================
// Tests
// ============================================================================
