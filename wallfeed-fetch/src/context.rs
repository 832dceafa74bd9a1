//! Fetch context shared by every adapter.
//!
//! The context bundles the tracker, balancer, resilient caller, and transport.
//! It is built once at startup and passed by reference; nothing here is
//! global.

use std::sync::Arc;
use std::time::Duration;

use wallfeed_core::QuotaTable;

use crate::balancer::{LoadBalancer, DEFAULT_RESET_WINDOW};
use crate::error::TransportError;
use crate::http::{HttpClient, Transport, DEFAULT_TIMEOUT};
use crate::policy::{FixedWindowPolicy, RateLimitPolicy};
use crate::resilient::{ResilientCaller, RetryPolicy, DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES};
use crate::tracker::UsageTracker;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for upstream calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Retries after the first attempt on transient failures.
    pub max_retries: u32,
    /// Backoff unit; retry `n` waits `backoff_base * n`.
    pub backoff_base: Duration,
    /// Quota window length.
    pub reset_window: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Per-provider quotas.
    pub quotas: QuotaTable,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            reset_window: DEFAULT_RESET_WINDOW,
            timeout: DEFAULT_TIMEOUT,
            quotas: QuotaTable::default(),
        }
    }
}

impl FetchSettings {
    /// Sets the retry count.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff base.
    #[must_use]
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Sets the quota window.
    #[must_use]
    pub fn with_reset_window(mut self, window: Duration) -> Self {
        self.reset_window = window;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the quota table.
    #[must_use]
    pub fn with_quotas(mut self, quotas: QuotaTable) -> Self {
        self.quotas = quotas;
        self
    }

    /// Retry policy derived from these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries).with_backoff_base(self.backoff_base)
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Shared services for upstream calls.
pub struct FetchContext {
    /// Usage counters.
    pub tracker: Arc<UsageTracker>,
    /// Provider selection.
    pub balancer: Arc<LoadBalancer>,
    /// Retry and bookkeeping wrapper.
    pub caller: ResilientCaller,
    /// Request transport.
    pub transport: Arc<dyn Transport>,
    /// Settings the context was built from.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default settings and an HTTP transport.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with custom settings and an HTTP transport.
    pub fn with_settings(settings: FetchSettings) -> Result<Self, TransportError> {
        FetchContextBuilder::new().settings(settings).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    tracker: Option<Arc<UsageTracker>>,
    transport: Option<Arc<dyn Transport>>,
    policy: Option<Arc<dyn RateLimitPolicy>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing tracker.
    #[must_use]
    pub fn tracker(mut self, tracker: Arc<UsageTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Sets the transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Overrides the rate-limit policy (default: fixed window over the quotas).
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn RateLimitPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Builds the fetch context.
    ///
    /// Fails only if no transport was given and the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<FetchContext, TransportError> {
        let settings = self.settings;
        let tracker = self.tracker.unwrap_or_default();
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::with_timeout(settings.timeout)?),
        };
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(FixedWindowPolicy::new(settings.quotas.clone())));

        let balancer = Arc::new(
            LoadBalancer::new(settings.quotas.clone(), Arc::clone(&tracker))
                .with_window(settings.reset_window),
        );
        let caller = ResilientCaller::new(Arc::clone(&tracker), policy, settings.retry_policy());

        Ok(FetchContext {
            tracker,
            balancer,
            caller,
            transport,
            settings,
        })
    }
}

impl std::fmt::Debug for FetchContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContextBuilder")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
