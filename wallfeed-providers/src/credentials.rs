//! API keys for providers.
//!
//! Keys are read from environment variables. The variable names default to
//! the ones each provider documents and can be overridden from config.

use std::collections::BTreeMap;

use tracing::debug;
use wallfeed_core::ProviderId;

/// Default environment variable holding a provider's API key.
pub fn default_env_var(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Unsplash => "UNSPLASH_ACCESS_KEY",
        ProviderId::Pexels => "PEXELS_API_KEY",
        ProviderId::Pixabay => "PIXABAY_API_KEY",
        ProviderId::Wallhaven => "WALLHAVEN_API_KEY",
    }
}

/// True if the provider refuses requests without a key.
pub fn requires_key(provider: ProviderId) -> bool {
    !matches!(provider, ProviderId::Wallhaven)
}

/// Resolved API keys, one per provider at most.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    keys: BTreeMap<ProviderId, String>,
}

impl ApiKeys {
    /// No keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads keys from the default environment variables.
    pub fn from_env() -> Self {
        Self::from_env_names(&BTreeMap::new())
    }

    /// Reads keys from the environment, using `names` where given and the
    /// default variable otherwise.
    pub fn from_env_names(names: &BTreeMap<ProviderId, String>) -> Self {
        Self::from_lookup(names, |var| std::env::var(var).ok())
    }

    /// Resolves keys through `lookup` instead of the process environment.
    pub fn from_lookup(
        names: &BTreeMap<ProviderId, String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut keys = Self::new();
        for provider in ProviderId::all() {
            let var = names
                .get(provider)
                .map_or_else(|| default_env_var(*provider), String::as_str);
            if let Some(value) = lookup(var) {
                keys = keys.with(*provider, value);
            } else {
                debug!(provider = %provider, var, "No API key in environment");
            }
        }
        keys
    }

    /// Sets a key. Blank keys are ignored.
    #[must_use]
    pub fn with(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        let key = key.into();
        let key = key.trim();
        if !key.is_empty() {
            self.keys.insert(provider, key.to_string());
        }
        self
    }

    /// Key for a provider.
    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    /// True if the provider can be used with these keys.
    pub fn is_usable(&self, provider: ProviderId) -> bool {
        !requires_key(provider) || self.get(provider).is_some()
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_set().entries(self.keys.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_uses_overrides_and_defaults() {
        let names = BTreeMap::from([(ProviderId::Pexels, "MY_PEXELS".to_string())]);
        let keys = ApiKeys::from_lookup(&names, |var| match var {
            "MY_PEXELS" => Some("p-key".to_string()),
            "UNSPLASH_ACCESS_KEY" => Some("u-key".to_string()),
            "PIXABAY_API_KEY" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(keys.get(ProviderId::Pexels), Some("p-key"));
        assert_eq!(keys.get(ProviderId::Unsplash), Some("u-key"));
        assert_eq!(keys.get(ProviderId::Pixabay), None);
        assert_eq!(keys.get(ProviderId::Wallhaven), None);
    }

    #[test]
    fn test_usable_providers() {
        let keys = ApiKeys::new().with(ProviderId::Unsplash, "k");
        assert!(keys.is_usable(ProviderId::Unsplash));
        assert!(!keys.is_usable(ProviderId::Pexels));
        assert!(keys.is_usable(ProviderId::Wallhaven));
    }

    #[test]
    fn test_debug_hides_keys() {
        let keys = ApiKeys::new().with(ProviderId::Unsplash, "secret");
        assert!(!format!("{keys:?}").contains("secret"));
    }
}
