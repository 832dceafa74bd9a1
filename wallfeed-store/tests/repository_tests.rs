//! Repository behavior through the public API.
//!
//! Adapters are in-process fakes, so these tests exercise cache keys,
//! freshness, provider routing and the reconciler's emission order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wallfeed_core::{
    CallOutcome, Collection, ProviderError, ProviderId, QuotaTable, SearchFilters, Wallpaper,
    WallpaperProvider,
};
use wallfeed_fetch::{LoadBalancer, UsageTracker};
use wallfeed_providers::ProviderRegistry;
use wallfeed_store::{
    CacheEntry, MemoryCache, RepositoryOptions, WallpaperCache, WallpaperRepository,
    collect_states,
};

// ============================================================================
// Fake Adapter
// ============================================================================

#[derive(Debug)]
struct FakeAdapter {
    provider: ProviderId,
    calls: AtomicU32,
    scripted: Mutex<VecDeque<CallOutcome<Vec<Wallpaper>>>>,
    downloads: Mutex<Vec<String>>,
}

impl FakeAdapter {
    fn new(provider: ProviderId) -> Arc<Self> {
        Arc::new(Self {
            provider,
            calls: AtomicU32::new(0),
            scripted: Mutex::new(VecDeque::new()),
            downloads: Mutex::new(Vec::new()),
        })
    }

    fn script(&self, outcome: CallOutcome<Vec<Wallpaper>>) {
        self.scripted.lock().unwrap().push_back(outcome);
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self, label: &str) -> CallOutcome<Vec<Wallpaper>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CallOutcome::Success(vec![wallpaper(self.provider, &format!("{label}{n}"))]))
    }
}

fn wallpaper(provider: ProviderId, native: &str) -> Wallpaper {
    Wallpaper::builder(provider, native, format!("https://img/{native}")).build()
}

#[async_trait]
impl WallpaperProvider for FakeAdapter {
    fn provider_id(&self) -> ProviderId {
        self.provider
    }

    async fn get_featured(&self, _page: u32, _per_page: u32) -> CallOutcome<Vec<Wallpaper>> {
        self.next("featured")
    }

    async fn search(
        &self,
        query: &str,
        _page: u32,
        _per_page: u32,
        _filters: &SearchFilters,
    ) -> CallOutcome<Vec<Wallpaper>> {
        self.next(query)
    }

    async fn get_by_id(&self, id: &str) -> CallOutcome<Option<Wallpaper>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let native = id.split_once('_').map_or(id, |(_, n)| n);
        CallOutcome::Success(Some(wallpaper(self.provider, native)))
    }

    async fn get_random(&self, _count: u32, _category: Option<&str>) -> CallOutcome<Vec<Wallpaper>> {
        self.next("random")
    }

    async fn get_collections(&self, _page: u32, _per_page: u32) -> CallOutcome<Vec<Collection>> {
        CallOutcome::Success(Vec::new())
    }

    async fn get_by_collection(
        &self,
        _collection_id: &str,
        _page: u32,
        _per_page: u32,
    ) -> CallOutcome<Vec<Wallpaper>> {
        self.next("collected")
    }

    async fn track_download(&self, id: &str) -> CallOutcome<()> {
        self.downloads.lock().unwrap().push(id.to_string());
        CallOutcome::Success(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    unsplash: Arc<FakeAdapter>,
    pexels: Arc<FakeAdapter>,
    cache: Arc<MemoryCache>,
    repo: WallpaperRepository,
}

fn fixture(options: RepositoryOptions) -> Fixture {
    let quotas = QuotaTable::new([(ProviderId::Unsplash, 50), (ProviderId::Pexels, 200)]).unwrap();
    let balancer = Arc::new(LoadBalancer::new(quotas, Arc::new(UsageTracker::new())));
    let unsplash = FakeAdapter::new(ProviderId::Unsplash);
    let pexels = FakeAdapter::new(ProviderId::Pexels);
    let registry = ProviderRegistry::empty(balancer)
        .register(Arc::clone(&unsplash) as Arc<dyn WallpaperProvider>)
        .register(Arc::clone(&pexels) as Arc<dyn WallpaperProvider>);
    let cache = Arc::new(MemoryCache::new());
    let repo = WallpaperRepository::new(Arc::new(registry), Arc::clone(&cache) as Arc<dyn WallpaperCache>)
        .with_options(options);
    Fixture {
        unsplash,
        pexels,
        cache,
        repo,
    }
}

fn items(state: &CallOutcome<CacheEntry>) -> Vec<String> {
    state
        .success()
        .map(|entry| entry.items.iter().map(|w| w.id.clone()).collect())
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn first_load_then_served_from_cache() {
    let f = fixture(RepositoryOptions::default());

    let first = collect_states(f.repo.featured(1, 24)).await;
    assert_eq!(first.len(), 2);
    assert_eq!(first[0], CallOutcome::Loading);
    assert_eq!(items(&first[1]), vec!["unsplash_featured1"]);

    let second = collect_states(f.repo.featured(1, 24)).await;
    assert_eq!(second.len(), 1);
    assert_eq!(items(&second[0]), vec!["unsplash_featured1"]);
    assert_eq!(f.unsplash.calls() + f.pexels.calls(), 1);
}

#[tokio::test]
async fn force_refresh_shows_cache_then_fetches() {
    let f = fixture(RepositoryOptions::default());
    collect_states(f.repo.featured(1, 24)).await;

    let refreshed = f.repo.clone().with_options(RepositoryOptions {
        force_refresh: true,
        ..RepositoryOptions::default()
    });
    let states = collect_states(refreshed.featured(1, 24)).await;

    assert_eq!(states.len(), 2);
    assert_eq!(items(&states[0]), vec!["unsplash_featured1"]);
    // The balancer moves to Pexels for the second fetch.
    assert_eq!(items(&states[1]), vec!["pexels_featured1"]);
}

#[tokio::test]
async fn stale_entries_are_refetched() {
    let f = fixture(RepositoryOptions {
        cache_ttl: Duration::ZERO,
        force_refresh: false,
    });
    collect_states(f.repo.search("sea", SearchFilters::new(), 1, 10)).await;
    let states = collect_states(f.repo.search("sea", SearchFilters::new(), 1, 10)).await;
    assert_eq!(states.len(), 2);
    assert_eq!(f.unsplash.calls() + f.pexels.calls(), 2);
}

#[tokio::test]
async fn random_always_fetches() {
    let f = fixture(RepositoryOptions::default());
    collect_states(f.repo.random(3, Some("nature"))).await;
    let states = collect_states(f.repo.random(3, Some("nature"))).await;
    assert_eq!(states.len(), 2);
    assert!(states[0].is_success());
    assert_eq!(f.unsplash.calls() + f.pexels.calls(), 2);
}

#[tokio::test]
async fn upstream_error_keeps_cached_list() {
    let f = fixture(RepositoryOptions {
        force_refresh: true,
        ..RepositoryOptions::default()
    });
    collect_states(f.repo.collection("pexels_9", 1, 10)).await;

    let err = ProviderError::with_code(ProviderId::Pexels, 429, "rate limit exceeded");
    f.pexels.script(CallOutcome::Error(err.clone()));
    let states = collect_states(f.repo.collection("pexels_9", 1, 10)).await;

    assert_eq!(items(&states[0]), vec!["pexels_collected1"]);
    assert_eq!(states[1], CallOutcome::Error(err));
    let cached = f.cache.get("collection:pexels_9:1:10").await.unwrap().unwrap();
    assert_eq!(cached.items.len(), 1);
}

#[tokio::test]
async fn collection_without_owner_is_an_error() {
    let f = fixture(RepositoryOptions::default());
    let states = collect_states(f.repo.collection("wallhaven_me/1", 1, 10)).await;
    assert_eq!(states[0], CallOutcome::Loading);
    let err = states[1].failure().unwrap();
    assert!(err.message.contains("no provider"));
    assert_eq!(f.unsplash.calls() + f.pexels.calls(), 0);
}

#[tokio::test]
async fn wallpaper_lookup_prefers_cache() {
    let f = fixture(RepositoryOptions::default());
    collect_states(f.repo.featured(1, 24)).await;
    let before = f.unsplash.calls();

    let cached = f.repo.wallpaper("unsplash_featured1").await;
    assert_eq!(cached.into_success().unwrap().unwrap().id, "unsplash_featured1");
    assert_eq!(f.unsplash.calls(), before);

    let remote = f.repo.wallpaper("pexels_77").await;
    assert_eq!(remote.into_success().unwrap().unwrap().id, "pexels_77");
    assert_eq!(f.pexels.calls(), 1);
}

#[tokio::test]
async fn lookups_without_owner_fail() {
    let f = fixture(RepositoryOptions::default());
    let outcome = f.repo.wallpaper("wallhaven_abc").await;
    assert_eq!(outcome.failure().unwrap().provider, ProviderId::Wallhaven);

    let outcome = f.repo.track_download("no-prefix").await;
    assert!(outcome.failure().unwrap().message.contains("prefix"));
}

#[tokio::test]
async fn downloads_go_to_owner() {
    let f = fixture(RepositoryOptions::default());
    assert!(f.repo.track_download("unsplash_abc").await.is_success());
    assert_eq!(*f.unsplash.downloads.lock().unwrap(), vec!["unsplash_abc"]);
    assert!(f.pexels.downloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn collections_route_by_provider() {
    let f = fixture(RepositoryOptions::default());
    assert!(f.repo.collections(ProviderId::Pexels, 1, 10).await.is_success());
    assert!(f.repo.collections(ProviderId::Pixabay, 1, 10).await.is_error());
}

#[tokio::test]
async fn clear_cache_forces_loading_again() {
    let f = fixture(RepositoryOptions::default());
    collect_states(f.repo.featured(1, 24)).await;
    f.repo.clear_cache().await.unwrap();
    let states = collect_states(f.repo.featured(1, 24)).await;
    assert_eq!(states[0], CallOutcome::Loading);
}
