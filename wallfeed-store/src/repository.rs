//! Wallpaper repository.
//!
//! Ties the reconciler to the provider registry and a cache. Every list
//! query has a stable cache key; open queries (featured, search, random)
//! go to the provider the load balancer picks at fetch time, collection
//! and id lookups go to the owning provider.

use async_trait::async_trait;
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use wallfeed_core::{
    CallOutcome, Collection, ProviderId, SearchFilters, Wallpaper, WallpaperProvider,
    split_namespaced_id,
};
use wallfeed_providers::ProviderRegistry;

use crate::cache::{CacheEntry, WallpaperCache};
use crate::config::DEFAULT_CACHE_TTL;
use crate::error::StoreError;
use crate::resource::{CachedResource, reconcile};

// ============================================================================
// Queries
// ============================================================================

/// A cacheable list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    /// Curated wallpapers.
    Featured {
        /// 1-based page.
        page: u32,
        /// Items per page.
        per_page: u32,
    },
    /// Free-text search.
    Search {
        /// Search terms.
        query: String,
        /// Provider filters.
        filters: SearchFilters,
        /// 1-based page.
        page: u32,
        /// Items per page.
        per_page: u32,
    },
    /// Random wallpapers. Always refetched.
    Random {
        /// Number of items.
        count: u32,
        /// Optional category.
        category: Option<String>,
    },
    /// Contents of a namespaced collection.
    Collection {
        /// Namespaced collection id.
        id: String,
        /// 1-based page.
        page: u32,
        /// Items per page.
        per_page: u32,
    },
}

impl ListQuery {
    /// Stable cache key.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Featured { page, per_page } => format!("featured:{page}:{per_page}"),
            Self::Search {
                query,
                filters,
                page,
                per_page,
            } => {
                let filters: Vec<_> = filters.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!(
                    "search:{}:{}:{page}:{per_page}",
                    query.trim().to_lowercase(),
                    filters.join("&")
                )
            }
            Self::Random { category, .. } => {
                format!("random:{}", category.as_deref().unwrap_or("any"))
            }
            Self::Collection { id, page, per_page } => format!("collection:{id}:{page}:{per_page}"),
        }
    }

    fn always_fetch(&self) -> bool {
        matches!(self, Self::Random { .. })
    }
}

// ============================================================================
// Options
// ============================================================================

/// Repository behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Cached lists younger than this are served without a fetch.
    pub cache_ttl: Duration,
    /// Fetch even when the cache is fresh.
    pub force_refresh: bool,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            force_refresh: false,
        }
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Offline-first access to wallpapers across providers.
#[derive(Debug, Clone)]
pub struct WallpaperRepository {
    registry: Arc<ProviderRegistry>,
    cache: Arc<dyn WallpaperCache>,
    options: RepositoryOptions,
}

impl WallpaperRepository {
    /// Creates a repository with default options.
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<dyn WallpaperCache>) -> Self {
        Self {
            registry,
            cache,
            options: RepositoryOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: RepositoryOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    /// The registry serving remote calls.
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Reconciles any list query.
    pub fn list(&self, query: ListQuery) -> impl Stream<Item = CallOutcome<CacheEntry>> + Send + use<> {
        debug!(key = %query.cache_key(), "Reconciling list");
        reconcile(ListResource {
            registry: Arc::clone(&self.registry),
            cache: Arc::clone(&self.cache),
            key: query.cache_key(),
            query,
            options: self.options,
        })
    }

    /// Curated wallpapers.
    pub fn featured(&self, page: u32, per_page: u32) -> impl Stream<Item = CallOutcome<CacheEntry>> + Send + use<> {
        self.list(ListQuery::Featured { page, per_page })
    }

    /// Search results.
    pub fn search(
        &self,
        query: &str,
        filters: SearchFilters,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = CallOutcome<CacheEntry>> + Send + use<> {
        self.list(ListQuery::Search {
            query: query.to_string(),
            filters,
            page,
            per_page,
        })
    }

    /// Random wallpapers. The previous random batch is shown first.
    pub fn random(
        &self,
        count: u32,
        category: Option<&str>,
    ) -> impl Stream<Item = CallOutcome<CacheEntry>> + Send + use<> {
        self.list(ListQuery::Random {
            count,
            category: category.map(str::to_string),
        })
    }

    /// Contents of a collection.
    pub fn collection(
        &self,
        collection_id: &str,
        page: u32,
        per_page: u32,
    ) -> impl Stream<Item = CallOutcome<CacheEntry>> + Send + use<> {
        self.list(ListQuery::Collection {
            id: collection_id.to_string(),
            page,
            per_page,
        })
    }

    /// Collections offered by a provider. Not cached.
    #[instrument(skip(self))]
    pub async fn collections(
        &self,
        provider: ProviderId,
        page: u32,
        per_page: u32,
    ) -> CallOutcome<Vec<Collection>> {
        match self.registry.get(provider) {
            Some(adapter) => adapter.get_collections(page, per_page).await,
            None => unavailable(provider),
        }
    }

    /// Looks up one wallpaper, first in cached lists, then upstream.
    #[instrument(skip(self))]
    pub async fn wallpaper(&self, id: &str) -> CallOutcome<Option<Wallpaper>> {
        match self.cache.query("").await {
            Ok(entries) => {
                if let Some(found) = entries.iter().find_map(|e| e.find(id)) {
                    debug!(id, "Wallpaper served from cache");
                    return CallOutcome::Success(Some(found.clone()));
                }
            }
            Err(e) => warn!(error = %e, "Cache lookup failed"),
        }

        match self.owner(id) {
            Ok(adapter) => adapter.get_by_id(id).await,
            Err(outcome) => outcome,
        }
    }

    /// Reports a download to the owning provider.
    #[instrument(skip(self))]
    pub async fn track_download(&self, id: &str) -> CallOutcome<()> {
        match self.owner(id) {
            Ok(adapter) => adapter.track_download(id).await,
            Err(outcome) => outcome,
        }
    }

    /// Removes every cached list.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be cleared.
    pub async fn clear_cache(&self) -> Result<(), StoreError> {
        self.cache.clear().await
    }

    fn owner<T>(&self, id: &str) -> Result<Arc<dyn WallpaperProvider>, CallOutcome<T>> {
        let Some((provider, _)) = split_namespaced_id(id) else {
            return Err(CallOutcome::error(
                ProviderId::default(),
                format!("id has no provider prefix: {id}"),
            ));
        };
        self.registry.get(provider).ok_or_else(|| unavailable(provider))
    }
}

fn unavailable<T>(provider: ProviderId) -> CallOutcome<T> {
    CallOutcome::error(provider, format!("{provider} is not configured"))
}

// ============================================================================
// List Resource
// ============================================================================

struct ListResource {
    registry: Arc<ProviderRegistry>,
    cache: Arc<dyn WallpaperCache>,
    key: String,
    query: ListQuery,
    options: RepositoryOptions,
}

impl ListResource {
    fn adapter(&self) -> Result<Arc<dyn WallpaperProvider>, StoreError> {
        let adapter = match &self.query {
            ListQuery::Collection { id, .. } => self.registry.for_id(id),
            _ => self.registry.balanced(),
        };
        adapter.ok_or_else(|| StoreError::ProviderUnavailable(format!("no provider can serve {}", self.key)))
    }
}

#[async_trait]
impl CachedResource for ListResource {
    type Local = CacheEntry;
    type Remote = Vec<Wallpaper>;

    async fn read_cache(&self) -> Option<CacheEntry> {
        match self.cache.get(&self.key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cache read failed, treating as empty");
                None
            }
        }
    }

    fn should_fetch(&self, cached: Option<&CacheEntry>) -> bool {
        self.options.force_refresh
            || self.query.always_fetch()
            || cached.is_none_or(|entry| entry.is_stale(self.options.cache_ttl))
    }

    async fn fetch_remote(&self) -> Result<CallOutcome<Vec<Wallpaper>>, StoreError> {
        let adapter = self.adapter()?;
        debug!(key = %self.key, provider = %adapter.provider_id(), "Fetching list");
        let outcome = match &self.query {
            ListQuery::Featured { page, per_page } => adapter.get_featured(*page, *per_page).await,
            ListQuery::Search {
                query,
                filters,
                page,
                per_page,
            } => adapter.search(query, *page, *per_page, filters).await,
            ListQuery::Random { count, category } => {
                adapter.get_random(*count, category.as_deref()).await
            }
            ListQuery::Collection { id, page, per_page } => {
                adapter.get_by_collection(id, *page, *per_page).await
            }
        };
        Ok(outcome)
    }

    async fn write_cache(&self, remote: &Vec<Wallpaper>) -> Result<(), StoreError> {
        self.cache.put(CacheEntry::new(self.key.clone(), remote.clone())).await
    }

    fn map_to_local(&self, remote: Vec<Wallpaper>) -> CacheEntry {
        CacheEntry::new(self.key.clone(), remote)
    }

    fn on_fetch_failed(&self, error: &StoreError) {
        warn!(key = %self.key, error = %error, "List fetch failed");
    }
}

// ============================================================================
// Tests
// ============================================================================
