//! Per-provider usage tracking.
//!
//! Pure bookkeeping: no I/O, no errors. Every provider owns its own lock, so
//! concurrent calls against different providers never contend.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};
use wallfeed_core::{ProviderError, ProviderId, UsageCounters};

// ============================================================================
// Usage Tracker
// ============================================================================

/// Call/success/error counters for every provider.
///
/// Constructed once at startup and shared as `Arc<UsageTracker>`.
///
/// A call may be counted ahead of time with [`reserve`](Self::reserve) when
/// the load balancer picks the provider. The next attempt recorded for that
/// provider claims the reservation instead of counting again.
#[derive(Debug)]
pub struct UsageTracker {
    slots: [Mutex<Slot>; ProviderId::COUNT],
}

#[derive(Debug, Default)]
struct Slot {
    counters: UsageCounters,
    reserved: u32,
}

impl UsageTracker {
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Mutex::new(Slot::default())),
        }
    }

    fn slot(&self, provider: ProviderId) -> MutexGuard<'_, Slot> {
        // Counter updates cannot leave the struct half-written, so a poisoned
        // lock still holds consistent data.
        self.slots[provider.to_index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one call attempt.
    ///
    /// Claims a pending reservation if there is one; the call was already
    /// counted when it was reserved.
    pub fn record_call(&self, provider: ProviderId) {
        let mut slot = self.slot(provider);
        if slot.reserved > 0 {
            slot.reserved -= 1;
        } else {
            slot.counters.calls += 1;
        }
        trace!(provider = %provider, calls = slot.counters.calls, "Call recorded");
    }

    /// Counts a call that has been committed to but not attempted yet.
    pub fn reserve(&self, provider: ProviderId) {
        let mut slot = self.slot(provider);
        slot.counters.calls += 1;
        slot.reserved = slot.reserved.saturating_add(1);
        trace!(provider = %provider, calls = slot.counters.calls, "Call reserved");
    }

    /// Reserved calls not yet claimed by an attempt.
    pub fn reserved(&self, provider: ProviderId) -> u32 {
        self.slot(provider).reserved
    }

    /// Records a successful call.
    pub fn record_success(&self, provider: ProviderId) {
        let mut slot = self.slot(provider);
        slot.counters.successes += 1;
        keep_calls_consistent(&mut slot.counters);
    }

    /// Records a failed call.
    pub fn record_error(&self, provider: ProviderId, message: &str, code: Option<u16>) {
        let mut slot = self.slot(provider);
        let counters = &mut slot.counters;
        counters.errors += 1;
        counters.last_error = Some(ProviderError {
            code,
            message: message.to_string(),
            provider,
        });
        keep_calls_consistent(counters);
        debug!(provider = %provider, errors = counters.errors, code = ?code, "Error recorded");
    }

    /// Snapshot of one provider's counters. Reserved calls are included.
    pub fn stats_for(&self, provider: ProviderId) -> UsageCounters {
        self.slot(provider).counters.clone()
    }

    /// Counters as the next attempt should be judged against.
    ///
    /// A pending reservation belongs to that attempt, so it is not held
    /// against it.
    pub fn stats_before_attempt(&self, provider: ProviderId) -> UsageCounters {
        let slot = self.slot(provider);
        let mut counters = slot.counters.clone();
        if slot.reserved > 0 {
            counters.calls = counters.calls.saturating_sub(1);
        }
        counters
    }

    /// Snapshot of every provider's counters.
    pub fn all_stats(&self) -> BTreeMap<ProviderId, UsageCounters> {
        ProviderId::all()
            .iter()
            .map(|p| (*p, self.stats_for(*p)))
            .collect()
    }

    /// Zeroes one provider, dropping its reservations.
    pub fn reset(&self, provider: ProviderId) {
        *self.slot(provider) = Slot::default();
    }

    /// Zeroes every provider.
    pub fn reset_all(&self) {
        for provider in ProviderId::all() {
            self.reset(*provider);
        }
        debug!("Usage counters reset");
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// An outcome recorded without a call implies the call.
fn keep_calls_consistent(counters: &mut UsageCounters) {
    let resolved = counters.successes + counters.errors;
    if resolved > counters.calls {
        counters.calls = resolved;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counts_per_provider() {
        let tracker = UsageTracker::new();
        tracker.record_call(ProviderId::Pexels);
        tracker.record_success(ProviderId::Pexels);
        tracker.record_call(ProviderId::Pexels);
        tracker.record_error(ProviderId::Pexels, "boom", Some(500));

        let stats = tracker.stats_for(ProviderId::Pexels);
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.last_error.unwrap().code, Some(500));

        assert!(tracker.stats_for(ProviderId::Unsplash).is_zero());
    }

    #[test]
    fn test_reset_all_zeroes_everything() {
        let tracker = UsageTracker::new();
        for p in ProviderId::all() {
            tracker.record_call(*p);
            tracker.record_error(*p, "x", None);
        }
        tracker.reset_all();
        for p in ProviderId::all() {
            assert_eq!(tracker.stats_for(*p), UsageCounters::default());
        }
    }

    #[test]
    fn test_reset_single_provider() {
        let tracker = UsageTracker::new();
        tracker.record_call(ProviderId::Pixabay);
        tracker.record_call(ProviderId::Wallhaven);
        tracker.reset(ProviderId::Pixabay);
        assert_eq!(tracker.stats_for(ProviderId::Pixabay).calls, 0);
        assert_eq!(tracker.stats_for(ProviderId::Wallhaven).calls, 1);
    }

    #[test]
    fn test_outcome_without_call_keeps_invariant() {
        let tracker = UsageTracker::new();
        tracker.record_success(ProviderId::Unsplash);
        tracker.record_error(ProviderId::Unsplash, "x", None);
        let stats = tracker.stats_for(ProviderId::Unsplash);
        assert!(stats.successes + stats.errors <= stats.calls);
    }

    #[test]
    fn test_reserved_call_is_counted_once() {
        let tracker = UsageTracker::new();
        tracker.reserve(ProviderId::Pexels);
        assert_eq!(tracker.stats_for(ProviderId::Pexels).calls, 1);
        assert_eq!(tracker.stats_before_attempt(ProviderId::Pexels).calls, 0);

        // The first attempt claims the reservation, a retry counts again.
        tracker.record_call(ProviderId::Pexels);
        assert_eq!(tracker.stats_for(ProviderId::Pexels).calls, 1);
        assert_eq!(tracker.reserved(ProviderId::Pexels), 0);
        tracker.record_call(ProviderId::Pexels);
        assert_eq!(tracker.stats_for(ProviderId::Pexels).calls, 2);
        assert_eq!(tracker.stats_before_attempt(ProviderId::Pexels).calls, 2);
    }

    #[test]
    fn test_reset_drops_reservations() {
        let tracker = UsageTracker::new();
        tracker.reserve(ProviderId::Unsplash);
        tracker.reset_all();
        assert_eq!(tracker.reserved(ProviderId::Unsplash), 0);
        tracker.record_call(ProviderId::Unsplash);
        assert_eq!(tracker.stats_for(ProviderId::Unsplash).calls, 1);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let tracker = Arc::new(UsageTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    let provider = ProviderId::all()[i % ProviderId::COUNT];
                    for _ in 0..1000 {
                        tracker.record_call(provider);
                        tracker.record_success(provider);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let total: u64 = tracker.all_stats().values().map(|c| c.calls).sum();
        assert_eq!(total, 8000);
        for stats in tracker.all_stats().values() {
            assert_eq!(stats.calls, 2000);
            assert!(stats.successes + stats.errors <= stats.calls);
        }
    }
}
