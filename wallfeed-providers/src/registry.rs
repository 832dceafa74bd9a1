//! Provider registry.
//!
//! Built once from a [`FetchContext`] and passed by reference. Maps each
//! [`ProviderId`] to its adapter, and resolves which adapter serves a
//! request: the balancer's pick for open queries, the owner for id lookups.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};
use wallfeed_core::{ProviderId, WallpaperProvider, split_namespaced_id};
use wallfeed_fetch::{FetchContext, LoadBalancer};

use crate::credentials::ApiKeys;
use crate::pexels::PexelsAdapter;
use crate::pixabay::PixabayAdapter;
use crate::unsplash::UnsplashAdapter;
use crate::wallhaven::WallhavenAdapter;

// ============================================================================
// Registry Options
// ============================================================================

/// What to register.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// API keys.
    pub keys: ApiKeys,
    /// Providers to register, if usable with `keys`.
    pub enabled: Vec<ProviderId>,
    /// Account owning the Wallhaven key.
    pub wallhaven_username: Option<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            keys: ApiKeys::new(),
            enabled: ProviderId::all().to_vec(),
            wallhaven_username: None,
        }
    }
}

impl RegistryOptions {
    /// Enabled providers that can be used with the configured keys.
    pub fn usable_providers(&self) -> Vec<ProviderId> {
        ProviderId::all()
            .iter()
            .copied()
            .filter(|p| self.enabled.contains(p) && self.keys.is_usable(*p))
            .collect()
    }
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Adapter lookup table.
#[derive(Clone)]
pub struct ProviderRegistry {
    adapters: BTreeMap<ProviderId, Arc<dyn WallpaperProvider>>,
    balancer: Arc<LoadBalancer>,
}

impl ProviderRegistry {
    /// Registers an adapter for every usable provider.
    ///
    /// Providers that need a key and have none are skipped.
    pub fn new(ctx: &FetchContext, options: &RegistryOptions) -> Self {
        let mut registry = Self::empty(Arc::clone(&ctx.balancer));
        for provider in options.usable_providers() {
            let key = options.keys.get(provider).map(str::to_string);
            let adapter: Arc<dyn WallpaperProvider> = match provider {
                ProviderId::Unsplash => Arc::new(UnsplashAdapter::new(ctx, key)),
                ProviderId::Pexels => Arc::new(PexelsAdapter::new(ctx, key)),
                ProviderId::Pixabay => Arc::new(PixabayAdapter::new(ctx, key)),
                ProviderId::Wallhaven => Arc::new(
                    WallhavenAdapter::new(ctx, key)
                        .with_username(options.wallhaven_username.clone()),
                ),
            };
            registry = registry.register(adapter);
        }

        for provider in &options.enabled {
            if !registry.adapters.contains_key(provider) {
                warn!(provider = %provider, "Provider enabled but has no API key, skipping");
            }
        }
        info!(providers = ?registry.ids(), "Provider registry ready");
        registry
    }

    /// A registry with no adapters.
    pub fn empty(balancer: Arc<LoadBalancer>) -> Self {
        Self {
            adapters: BTreeMap::new(),
            balancer,
        }
    }

    /// Adds or replaces an adapter.
    #[must_use]
    pub fn register(mut self, adapter: Arc<dyn WallpaperProvider>) -> Self {
        self.adapters.insert(adapter.provider_id(), adapter);
        self
    }

    /// Adapter for a provider.
    pub fn get(&self, provider: ProviderId) -> Option<Arc<dyn WallpaperProvider>> {
        self.adapters.get(&provider).cloned()
    }

    /// Registered providers, in enumeration order.
    pub fn ids(&self) -> Vec<ProviderId> {
        self.adapters.keys().copied().collect()
    }

    /// True if no adapter is registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// The balancer used by [`balanced`](Self::balanced).
    pub fn balancer(&self) -> &Arc<LoadBalancer> {
        &self.balancer
    }

    /// Adapter chosen by the load balancer.
    ///
    /// If the balancer picks a provider that is not registered, the first
    /// registered adapter serves the request instead.
    pub fn balanced(&self) -> Option<Arc<dyn WallpaperProvider>> {
        let chosen = self.balancer.next_provider();
        if let Some(adapter) = self.get(chosen) {
            return Some(adapter);
        }
        let fallback = self.adapters.values().next().cloned();
        debug!(provider = %chosen, "Balancer chose an unregistered provider");
        fallback
    }

    /// Adapter owning a namespaced wallpaper or collection id.
    pub fn for_id(&self, id: &str) -> Option<Arc<dyn WallpaperProvider>> {
        let (provider, _) = split_namespaced_id(id)?;
        self.get(provider)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, context};
    use wallfeed_core::QuotaTable;
    use wallfeed_fetch::{FetchSettings, NeverLimited, Transport};

    #[test]
    fn test_skips_providers_without_keys() {
        let ctx = context(&ScriptedTransport::new());
        let options = RegistryOptions {
            keys: ApiKeys::new().with(ProviderId::Pexels, "k"),
            ..Default::default()
        };
        let registry = ProviderRegistry::new(&ctx, &options);
        assert_eq!(registry.ids(), vec![ProviderId::Pexels, ProviderId::Wallhaven]);
    }

    #[test]
    fn test_respects_enabled_list() {
        let ctx = context(&ScriptedTransport::new());
        let options = RegistryOptions {
            keys: ApiKeys::new().with(ProviderId::Unsplash, "k"),
            enabled: vec![ProviderId::Unsplash],
            wallhaven_username: None,
        };
        let registry = ProviderRegistry::new(&ctx, &options);
        assert_eq!(registry.ids(), vec![ProviderId::Unsplash]);
    }

    #[test]
    fn test_for_id_resolves_owner() {
        let ctx = context(&ScriptedTransport::new());
        let registry = ProviderRegistry::new(&ctx, &RegistryOptions::default());
        let adapter = registry.for_id("wallhaven_94x38z").unwrap();
        assert_eq!(adapter.provider_id(), ProviderId::Wallhaven);
        assert!(registry.for_id("unsplash_abc").is_none());
        assert!(registry.for_id("no-prefix").is_none());
    }

    #[test]
    fn test_balanced_follows_balancer() {
        let transport = ScriptedTransport::new();
        let quotas =
            QuotaTable::new([(ProviderId::Pexels, 10), (ProviderId::Wallhaven, 10)]).unwrap();
        let ctx = FetchContext::builder()
            .transport(transport as Arc<dyn Transport>)
            .policy(Arc::new(NeverLimited))
            .settings(FetchSettings::default().with_quotas(quotas))
            .build()
            .unwrap();
        let options = RegistryOptions {
            keys: ApiKeys::new().with(ProviderId::Pexels, "k"),
            ..Default::default()
        };
        let registry = ProviderRegistry::new(&ctx, &options);

        let first = registry.balanced().unwrap().provider_id();
        let second = registry.balanced().unwrap().provider_id();
        assert_eq!(first, ProviderId::Pexels);
        assert_eq!(second, ProviderId::Wallhaven);
    }

    #[test]
    fn test_balanced_falls_back_to_registered() {
        let ctx = context(&ScriptedTransport::new());
        let registry = ProviderRegistry::new(&ctx, &RegistryOptions::default());
        // Default quotas pick Unsplash first, which has no key here.
        let adapter = registry.balanced().unwrap();
        assert_eq!(adapter.provider_id(), ProviderId::Wallhaven);
    }
}
