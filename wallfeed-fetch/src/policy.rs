//! Rate-limit policies.
//!
//! The resilient call wrapper only asks a yes/no question before each call;
//! what "rate limited" means is decided here.

use wallfeed_core::{ProviderId, QuotaTable, UsageCounters};

/// Decides whether a provider should be short-circuited before a call.
pub trait RateLimitPolicy: Send + Sync + std::fmt::Debug {
    /// True if calls to `provider` must not be attempted right now.
    fn is_rate_limited(&self, provider: ProviderId, counters: &UsageCounters) -> bool;
}

/// Fixed-window policy: limited once `calls >= quota` in the current window.
///
/// The window is whatever period the tracker is reset on. Providers without
/// a quota are never limited.
#[derive(Debug, Clone)]
pub struct FixedWindowPolicy {
    quotas: QuotaTable,
}

impl FixedWindowPolicy {
    /// Creates a policy over the given quota table.
    pub fn new(quotas: QuotaTable) -> Self {
        Self { quotas }
    }
}

impl RateLimitPolicy for FixedWindowPolicy {
    fn is_rate_limited(&self, provider: ProviderId, counters: &UsageCounters) -> bool {
        self.quotas
            .get(provider)
            .is_some_and(|quota| counters.calls >= u64::from(quota))
    }
}

/// Never short-circuits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverLimited;

impl RateLimitPolicy for NeverLimited {
    fn is_rate_limited(&self, _provider: ProviderId, _counters: &UsageCounters) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(calls: u64) -> UsageCounters {
        UsageCounters {
            calls,
            ..Default::default()
        }
    }

    #[test]
    fn test_fixed_window_threshold() {
        let policy = FixedWindowPolicy::new(QuotaTable::default());
        assert!(!policy.is_rate_limited(ProviderId::Unsplash, &counters(49)));
        assert!(policy.is_rate_limited(ProviderId::Unsplash, &counters(50)));
        assert!(policy.is_rate_limited(ProviderId::Unsplash, &counters(51)));
    }

    #[test]
    fn test_unlisted_provider_is_never_limited() {
        let table = QuotaTable::new([(ProviderId::Pexels, 1)]).unwrap();
        let policy = FixedWindowPolicy::new(table);
        assert!(!policy.is_rate_limited(ProviderId::Wallhaven, &counters(1_000_000)));
    }

    #[test]
    fn test_never_limited() {
        assert!(!NeverLimited.is_rate_limited(ProviderId::Unsplash, &counters(u64::MAX)));
    }
}
