//! Configuration management.
//!
//! Every field has a default, so a missing file, or one that sets only a
//! few fields, still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use wallfeed_core::{ProviderId, QuotaTable};
use wallfeed_fetch::FetchSettings;
use wallfeed_fetch::balancer::DEFAULT_RESET_WINDOW;
use wallfeed_fetch::http::DEFAULT_TIMEOUT;
use wallfeed_fetch::resilient::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES};
use wallfeed_providers::{ApiKeys, RegistryOptions};

use crate::cache::DEFAULT_RETENTION;
use crate::error::StoreError;
use crate::persistence::{default_cache_path, default_config_path};

/// Default freshness window for cached lists.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Retry, timing and cache settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Calls allowed per provider per reset window.
    #[serde(default)]
    pub quotas: QuotaTable,
    /// Provider-specific configuration.
    #[serde(default)]
    pub providers: BTreeMap<ProviderId, ProviderConfig>,
}

/// Retry, timing and cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Retries after the first attempt for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff step in milliseconds.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Quota window in seconds.
    #[serde(default = "default_reset_window_secs")]
    pub reset_window_secs: u64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Age in seconds after which cached lists are refetched.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Age in seconds after which cached lists are evicted.
    #[serde(default = "default_cache_retention_secs")]
    pub cache_retention_secs: u64,
    /// Cache file location. Defaults to the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether this provider is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Account that owns the API key (Wallhaven collections).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_base_ms() -> u64 {
    u64::try_from(DEFAULT_BACKOFF_BASE.as_millis()).unwrap_or(1000)
}

fn default_reset_window_secs() -> u64 {
    DEFAULT_RESET_WINDOW.as_secs()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}

fn default_cache_retention_secs() -> u64 {
    DEFAULT_RETENTION.as_secs()
}

fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            reset_window_secs: default_reset_window_secs(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_retention_secs: default_cache_retention_secs(),
            cache_path: None,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: None,
            username: None,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails [`validate`](Self::validate).
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    ///
    /// # Errors
    ///
    /// See [`save_to`](Self::save_to).
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Rejects configurations the fetch layer cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` naming the offending field.
    pub fn validate(&self) -> Result<(), StoreError> {
        self.quotas.validate()?;
        if self.general.reset_window_secs == 0 {
            return Err(StoreError::Config("reset_window_secs must be positive".into()));
        }
        if self.general.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Returns whether a provider is enabled. Unlisted providers are.
    pub fn is_provider_enabled(&self, provider: ProviderId) -> bool {
        self.providers.get(&provider).is_none_or(|p| p.enabled)
    }

    /// Enabled providers in enumeration order.
    pub fn enabled_providers(&self) -> Vec<ProviderId> {
        ProviderId::all()
            .iter()
            .copied()
            .filter(|p| self.is_provider_enabled(*p))
            .collect()
    }

    /// Environment variable overrides for API keys.
    pub fn api_key_env_names(&self) -> BTreeMap<ProviderId, String> {
        self.providers
            .iter()
            .filter_map(|(provider, config)| Some((*provider, config.api_key_env.clone()?)))
            .collect()
    }

    /// Reads API keys from the environment.
    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys::from_env_names(&self.api_key_env_names())
    }

    /// Registry options for the given keys.
    pub fn registry_options(&self, keys: ApiKeys) -> RegistryOptions {
        RegistryOptions {
            keys,
            enabled: self.enabled_providers(),
            wallhaven_username: self
                .providers
                .get(&ProviderId::Wallhaven)
                .and_then(|p| p.username.clone()),
        }
    }

    /// Fetch settings with quotas limited to the usable providers.
    ///
    /// Keeping unusable providers out of the quota table stops the load
    /// balancer from choosing them. If nothing is usable the full table is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable provider has a quota.
    pub fn fetch_settings(&self, options: &RegistryOptions) -> Result<FetchSettings, StoreError> {
        let usable = options.usable_providers();
        let quotas = if usable.is_empty() {
            self.quotas.clone()
        } else {
            self.quotas.restricted_to(&usable)?
        };

        Ok(FetchSettings::default()
            .with_max_retries(self.general.max_retries)
            .with_backoff_base(Duration::from_millis(self.general.backoff_base_ms))
            .with_reset_window(Duration::from_secs(self.general.reset_window_secs))
            .with_timeout(Duration::from_secs(self.general.timeout_secs))
            .with_quotas(quotas))
    }

    /// Freshness window for cached lists.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.general.cache_ttl_secs)
    }

    /// How long cached lists are kept at all.
    pub fn cache_retention(&self) -> Duration {
        Duration::from_secs(self.general.cache_retention_secs)
    }

    /// Cache file location.
    pub fn cache_path(&self) -> PathBuf {
        self.general.cache_path.clone().unwrap_or_else(default_cache_path)
    }
}

// ============================================================================
// Tests
// ============================================================================
