//! Quota-aware load balancing across providers.
//!
//! Selection reads the [`UsageTracker`]'s call counts, picks the provider with
//! the smallest `calls / quota` ratio among those still under quota, and
//! reserves a call against it in the tracker. Selecting and reserving happen
//! under one lock, so two concurrent selections never both see the same
//! pre-increment count. Calls made outside the balancer (owner-routed
//! lookups, retries) land in the same counters and weigh on the next pick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};
use wallfeed_core::{ProviderId, ProviderQuota, QuotaTable};

use crate::tracker::UsageTracker;

/// Default reset window.
pub const DEFAULT_RESET_WINDOW: Duration = Duration::from_secs(60 * 60);

// ============================================================================
// Load Balancer
// ============================================================================

/// Chooses which provider to query next.
#[derive(Debug)]
pub struct LoadBalancer {
    quotas: QuotaTable,
    selection: Mutex<()>,
    tracker: Arc<UsageTracker>,
    window: Duration,
}

impl LoadBalancer {
    /// Creates a balancer over the tracker's counters.
    pub fn new(quotas: QuotaTable, tracker: Arc<UsageTracker>) -> Self {
        Self {
            quotas,
            selection: Mutex::new(()),
            tracker,
            window: DEFAULT_RESET_WINDOW,
        }
    }

    /// Overrides the reset window used by [`spawn_reset_task`](Self::spawn_reset_task).
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn calls(&self, provider: ProviderId) -> u64 {
        self.tracker.stats_for(provider).calls
    }

    /// Picks the next provider and reserves one call against it.
    ///
    /// Among providers below quota, the lowest `calls / quota` wins; ties go
    /// to enumeration order. When every provider is at or over quota, the
    /// provider with the highest quota is returned anyway and the caller's
    /// rate-limit check decides what happens next.
    #[instrument(skip(self))]
    pub fn next_provider(&self) -> ProviderId {
        let _selection = self.lock();

        let mut best: Option<(ProviderId, u64, ProviderQuota)> = None;
        for (provider, quota) in self.quotas.iter() {
            let calls = self.calls(provider);
            if calls >= u64::from(quota) {
                continue;
            }
            let better = match best {
                None => true,
                // calls / quota < best_calls / best_quota, without floats
                Some((_, best_calls, best_quota)) => {
                    u128::from(calls) * u128::from(best_quota)
                        < u128::from(best_calls) * u128::from(quota)
                }
            };
            if better {
                best = Some((provider, calls, quota));
            }
        }

        let chosen = match best {
            Some((provider, _, _)) => provider,
            None => {
                let fallback = self.quotas.highest_quota();
                debug!(provider = %fallback, "All providers at quota, falling back");
                fallback
            }
        };

        self.tracker.reserve(chosen);
        debug!(provider = %chosen, calls = self.calls(chosen), "Provider selected");
        chosen
    }

    /// Reserved calls not yet claimed by an attempt.
    pub fn reserved(&self, provider: ProviderId) -> u32 {
        self.tracker.reserved(provider)
    }

    /// `calls / quota` for a provider, or `None` if it has no quota.
    #[allow(clippy::cast_precision_loss)]
    pub fn load_ratio(&self, provider: ProviderId) -> Option<f64> {
        let quota = self.quotas.get(provider)?;
        Some(self.calls(provider) as f64 / f64::from(quota))
    }

    /// The quota table this balancer enforces.
    pub fn quotas(&self) -> &QuotaTable {
        &self.quotas
    }

    /// The reset window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Starts a new window: zeroes the tracker's counters.
    ///
    /// Runs under the selection lock, so a concurrent selection sees either
    /// the old window or the new one.
    pub fn reset(&self) {
        {
            let _selection = self.lock();
            self.tracker.reset_all();
        }
        info!("Quota window reset");
    }

    /// Spawns the background task resetting counts once per window.
    ///
    /// The task holds a weak reference and exits once the balancer is
    /// dropped.
    pub fn spawn_reset_task(self: &Arc<Self>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let window = self.window;
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + window, window);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(balancer) = weak.upgrade() else {
                    debug!("Balancer dropped, stopping reset task");
                    break;
                };
                balancer.reset();
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
