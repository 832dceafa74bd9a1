//! Usage counter types.

use serde::{Deserialize, Serialize};

use super::outcome::ProviderError;

/// Per-provider call bookkeeping for the current reset window.
///
/// All counts are monotonically increasing until the next reset, and
/// `successes + errors <= calls` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    /// Call attempts recorded.
    pub calls: u64,
    /// Successful calls.
    pub successes: u64,
    /// Failed calls.
    pub errors: u64,
    /// Most recent failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ProviderError>,
}

impl UsageCounters {
    /// Success rate in percent. 100 when no calls were made.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.calls == 0 {
            100.0
        } else {
            self.successes as f64 / self.calls as f64 * 100.0
        }
    }

    /// Error rate in percent. 0 when no calls were made.
    #[allow(clippy::cast_precision_loss)]
    pub fn error_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.errors as f64 / self.calls as f64 * 100.0
        }
    }

    /// Calls that have not resolved yet.
    pub fn in_flight(&self) -> u64 {
        self.calls.saturating_sub(self.successes + self.errors)
    }

    /// True if all counts are zero.
    pub fn is_zero(&self) -> bool {
        self.calls == 0 && self.successes == 0 && self.errors == 0
    }
}
