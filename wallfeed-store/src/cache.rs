//! Cache collaborator.
//!
//! The reconciler treats the cache as an opaque key-value store of wallpaper
//! lists. [`MemoryCache`] keeps entries for the life of the process;
//! [`JsonFileCache`] persists them to a single JSON file.
//!
//! Stale entries are kept, since they are what an offline run shows. Only
//! entries older than the retention period are dropped, on the next `put`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use wallfeed_core::Wallpaper;

use crate::error::StoreError;
use crate::persistence::{load_json_or_default, save_json};

/// Default age after which entries are evicted.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// ============================================================================
// Cache Entry
// ============================================================================

/// A cached wallpaper list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Stable key of the query that produced the list.
    pub key: String,
    /// Items in upstream order.
    pub items: Vec<Wallpaper>,
    /// When the list was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(key: impl Into<String>, items: Vec<Wallpaper>) -> Self {
        Self {
            key: key.into(),
            items,
            fetched_at: Utc::now(),
        }
    }

    /// Time elapsed since the fetch. Zero if the stamp is in the future.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.fetched_at).to_std().unwrap_or_default()
    }

    /// True once the entry is at least `ttl` old.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// True once the entry is older than the retention period.
    pub fn is_expired(&self, retention: Duration) -> bool {
        self.age() > retention
    }

    /// Finds a wallpaper by namespaced id.
    pub fn find(&self, id: &str) -> Option<&Wallpaper> {
        self.items.iter().find(|w| w.id == id)
    }
}

// ============================================================================
// Cache Trait
// ============================================================================

/// Key-value store of [`CacheEntry`] values.
#[async_trait]
pub trait WallpaperCache: Send + Sync + std::fmt::Debug {
    /// Entry stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Inserts or replaces the entry under `entry.key`.
    async fn put(&self, entry: CacheEntry) -> Result<(), StoreError>;

    /// Entries whose key starts with `prefix`, ordered by key.
    async fn query(&self, prefix: &str) -> Result<Vec<CacheEntry>, StoreError>;

    /// Removes an entry. Returns whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// Removes every entry.
    async fn clear(&self) -> Result<(), StoreError>;
}

// ============================================================================
// Memory Cache
// ============================================================================

/// In-process cache.
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    retention: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention: DEFAULT_RETENTION,
        }
    }
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long entries are kept.
    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl WallpaperCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| !e.is_expired(self.retention));
        entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn query(&self, prefix: &str) -> Result<Vec<CacheEntry>, StoreError> {
        let entries = self.entries.read().await;
        let mut matched: Vec<_> = entries
            .values()
            .filter(|e| e.key.starts_with(prefix))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(matched)
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// ============================================================================
// JSON File Cache
// ============================================================================

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheFile {
    /// Removes items a hand-edited or older file may hold that no mapper
    /// would produce.
    fn drop_invalid_items(&mut self) {
        for entry in self.entries.values_mut() {
            let key = &entry.key;
            entry.items.retain(|item| match item.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(key = %key, error = %e, "Dropping invalid cached wallpaper");
                    false
                }
            });
        }
    }
}

/// Cache persisted as one JSON file.
///
/// The whole map is held in memory and rewritten on every mutation. A
/// mutation only reaches memory once the file write succeeded. A missing or
/// unreadable file starts an empty cache.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    state: Mutex<CacheFile>,
    retention: Duration,
}

impl JsonFileCache {
    /// Opens the cache at `path`, loading existing entries.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut state: CacheFile = load_json_or_default(&path).await;
        state.drop_invalid_items();
        debug!(path = %path.display(), entries = state.entries.len(), "Opened wallpaper cache");
        Self {
            path,
            state: Mutex::new(state),
            retention: DEFAULT_RETENTION,
        }
    }

    /// Sets how long entries are kept.
    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `next` to disk, then makes it the in-memory state.
    async fn commit(&self, state: &mut CacheFile, next: CacheFile) -> Result<(), StoreError> {
        save_json(&self.path, &next).await?;
        *state = next;
        Ok(())
    }
}

#[async_trait]
impl WallpaperCache for JsonFileCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.state.lock().await.entries.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let before = next.entries.len();
        next.entries.retain(|_, e| !e.is_expired(self.retention));
        if next.entries.len() < before {
            debug!(evicted = before - next.entries.len(), "Evicted expired cache entries");
        }
        next.entries.insert(entry.key.clone(), entry);
        self.commit(&mut state, next).await
    }

    async fn query(&self, prefix: &str) -> Result<Vec<CacheEntry>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if !state.entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = state.clone();
        next.entries.remove(key);
        self.commit(&mut state, next).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        self.commit(&mut state, CacheFile::default()).await
    }
}

// ============================================================================
// Tests
// ============================================================================
