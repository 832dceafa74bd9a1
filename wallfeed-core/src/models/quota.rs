//! Static per-provider quota configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::provider::ProviderId;
use crate::error::CoreError;

/// Maximum calls permitted per reset window.
pub type ProviderQuota = u32;

/// Per-provider quota table.
///
/// Fixed at construction; nothing mutates it at runtime. Providers missing
/// from the table are not considered by the load balancer and are never
/// rate limited by the fixed-window policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaTable {
    quotas: BTreeMap<ProviderId, ProviderQuota>,
}

impl QuotaTable {
    /// Builds a table from `(provider, quota)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if any quota is zero or the table
    /// is empty.
    pub fn new(
        entries: impl IntoIterator<Item = (ProviderId, ProviderQuota)>,
    ) -> Result<Self, CoreError> {
        let quotas: BTreeMap<_, _> = entries.into_iter().collect();
        let table = Self { quotas };
        table.validate()?;
        Ok(table)
    }

    /// Checks every quota is positive and at least one provider is listed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quotas.is_empty() {
            return Err(CoreError::InvalidConfig("quota table is empty".to_string()));
        }
        if let Some((provider, _)) = self.quotas.iter().find(|(_, q)| **q == 0) {
            return Err(CoreError::InvalidConfig(format!(
                "quota for {provider} must be greater than zero"
            )));
        }
        Ok(())
    }

    /// Quota for a provider, if configured.
    pub fn get(&self, provider: ProviderId) -> Option<ProviderQuota> {
        self.quotas.get(&provider).copied()
    }

    /// Providers in the table, in enumeration order.
    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.quotas.keys().copied()
    }

    /// Iterates `(provider, quota)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, ProviderQuota)> + '_ {
        self.quotas.iter().map(|(p, q)| (*p, *q))
    }

    /// Provider with the numerically highest quota.
    ///
    /// Ties go to the earliest provider in enumeration order.
    pub fn highest_quota(&self) -> ProviderId {
        let mut best: Option<(ProviderId, ProviderQuota)> = None;
        for (provider, quota) in self.iter() {
            match best {
                Some((_, q)) if q >= quota => {}
                _ => best = Some((provider, quota)),
            }
        }
        best.map(|(p, _)| p).unwrap_or_default()
    }

    /// Table keeping only the given providers.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if no listed provider remains.
    pub fn restricted_to(&self, providers: &[ProviderId]) -> Result<Self, CoreError> {
        Self::new(self.iter().filter(|(p, _)| providers.contains(p)))
    }

    /// Number of configured providers.
    pub fn len(&self) -> usize {
        self.quotas.len()
    }

    /// True if no providers are configured.
    pub fn is_empty(&self) -> bool {
        self.quotas.is_empty()
    }
}

impl Default for QuotaTable {
    /// Hourly quotas matching each provider's free API tier.
    fn default() -> Self {
        let quotas = BTreeMap::from([
            (ProviderId::Unsplash, 50),
            (ProviderId::Pexels, 200),
            (ProviderId::Pixabay, 100),
            // 45 requests/minute
            (ProviderId::Wallhaven, 2700),
        ]);
        Self { quotas }
    }
}

// ============================================================================
// Tests
// ============================================================================
