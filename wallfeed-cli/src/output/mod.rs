//! Output formatting for CLI.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use wallfeed_core::{ProviderId, ProviderQuota, UsageCounters};

/// One row of the providers listing.
#[derive(Debug, Clone)]
pub struct ProviderRow {
    pub provider: ProviderId,
    pub enabled: bool,
    pub key_var: String,
    pub key_required: bool,
    pub has_key: bool,
    pub quota: Option<ProviderQuota>,
}

impl ProviderRow {
    /// Enabled and has a key if one is required.
    pub fn usable(&self) -> bool {
        self.enabled && (self.has_key || !self.key_required)
    }
}

/// Call counters for one provider in this run.
#[derive(Debug, Clone)]
pub struct StatsRow {
    pub provider: ProviderId,
    pub counters: UsageCounters,
    pub quota: Option<ProviderQuota>,
    pub reserved: u32,
}
