//! Resilient upstream call wrapper.
//!
//! Wraps one upstream operation with a rate-limit short circuit, linear
//! backoff retries for transient failures, and error classification. Every
//! attempt and outcome is reported to the [`UsageTracker`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use wallfeed_core::{CallOutcome, ProviderError, ProviderId};

use crate::error::{ErrorClass, TransportError};
use crate::policy::RateLimitPolicy;
use crate::tracker::UsageTracker;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default backoff base.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

/// Message used when retries are exhausted without a recorded failure.
const EXHAUSTED_MESSAGE: &str = "network error after retries";

// ============================================================================
// Retry Policy
// ============================================================================

/// Linear backoff: the n-th retry waits `base * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay unit.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Creates a retry policy.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Sets the backoff base.
    #[must_use]
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Sum of all backoff delays when every attempt fails.
    pub fn total_backoff(&self) -> Duration {
        (1..=self.max_retries)
            .map(|n| self.delay_for_attempt(n))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

// ============================================================================
// Resilient Caller
// ============================================================================

/// Executes upstream operations with retry, backoff, and bookkeeping.
///
/// Cheap to clone; clones share the tracker and policy.
#[derive(Debug, Clone)]
pub struct ResilientCaller {
    tracker: Arc<UsageTracker>,
    policy: Arc<dyn RateLimitPolicy>,
    retry: RetryPolicy,
}

impl ResilientCaller {
    /// Creates a caller.
    pub fn new(
        tracker: Arc<UsageTracker>,
        policy: Arc<dyn RateLimitPolicy>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            tracker,
            policy,
            retry,
        }
    }

    /// The tracker outcomes are reported to.
    pub fn tracker(&self) -> &Arc<UsageTracker> {
        &self.tracker
    }

    /// The default retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// [`call`](Self::call) with the configured default retry count.
    pub async fn call_default<T, F, Fut>(&self, provider: ProviderId, operation: F) -> CallOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        self.call(provider, self.retry.max_retries, operation).await
    }

    /// Runs `operation` against `provider`, retrying transient failures.
    ///
    /// - Rate limited by policy: `Error(429)` with no attempt made.
    /// - 403/429 from upstream: terminal, no retry.
    /// - Other HTTP status or I/O failure: retried up to `max_retries`
    ///   times, waiting `backoff_base * n` before retry `n`.
    /// - Any other failure: terminal, no retry.
    ///
    /// Backoff sleeps are not cancellable once started.
    #[instrument(skip(self, operation), fields(provider = %provider))]
    pub async fn call<T, F, Fut>(
        &self,
        provider: ProviderId,
        max_retries: u32,
        mut operation: F,
    ) -> CallOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        if self
            .policy
            .is_rate_limited(provider, &self.tracker.stats_before_attempt(provider))
        {
            warn!("Provider rate limited, skipping call");
            return CallOutcome::Error(ProviderError::with_code(
                provider,
                429,
                "rate limit exceeded",
            ));
        }

        let mut retry_count: u32 = 0;
        let mut last_failure: Option<String> = None;

        loop {
            self.tracker.record_call(provider);

            let error = match operation().await {
                Ok(value) => {
                    self.tracker.record_success(provider);
                    debug!(attempt = retry_count + 1, "Call succeeded");
                    return CallOutcome::Success(value);
                }
                Err(error) => error,
            };

            let message = error.to_string();
            self.tracker
                .record_error(provider, &message, error.status());

            match error.class() {
                ErrorClass::RateLimited => {
                    warn!(error = %error, "Upstream rate limit, not retrying");
                    let code = error.status().unwrap_or(429);
                    return CallOutcome::Error(ProviderError::with_code(provider, code, message));
                }
                ErrorClass::NonRetryable => {
                    warn!(error = %error, "Non-retryable failure");
                    return CallOutcome::Error(ProviderError::new(provider, message));
                }
                ErrorClass::TransientTransport => {
                    last_failure = Some(message);
                    retry_count += 1;
                    if retry_count > max_retries {
                        break;
                    }
                    let delay = self.retry.delay_for_attempt(retry_count);
                    info!(
                        error = %error,
                        retry = retry_count,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Transient failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(attempts = retry_count, "Retries exhausted");
        CallOutcome::Error(ProviderError::new(
            provider,
            last_failure.unwrap_or_else(|| EXHAUSTED_MESSAGE.to_string()),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
