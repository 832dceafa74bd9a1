// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Wallfeed Store
//!
//! Offline-first data access for Wallfeed.
//!
//! This crate provides:
//!
//! - **Reconciler**: [`reconcile`] turns cache + remote collaborators into a
//!   lazy stream of [`CallOutcome`](wallfeed_core::CallOutcome) states
//! - **Cache**: [`WallpaperCache`] with in-memory and JSON-file backends
//! - **Repository**: [`WallpaperRepository`] wiring the reconciler to the
//!   provider registry
//! - **Config**: the JSON configuration file
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use futures::StreamExt;
//! use wallfeed_store::{JsonFileCache, WallpaperRepository, default_cache_path};
//!
//! let cache = Arc::new(JsonFileCache::open(default_cache_path()).await);
//! let repo = WallpaperRepository::new(registry, cache);
//!
//! let mut states = std::pin::pin!(repo.featured(1, 24));
//! while let Some(state) = states.next().await {
//!     // Loading or cached data first, then the fresh result or an error
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;
pub mod repository;
pub mod resource;

pub use cache::{CacheEntry, DEFAULT_RETENTION, JsonFileCache, MemoryCache, WallpaperCache};
pub use config::{Config, DEFAULT_CACHE_TTL, GeneralConfig, ProviderConfig};
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_cache_path, default_config_dir, default_config_path, load_json,
    load_json_or_default, save_json,
};
pub use repository::{ListQuery, RepositoryOptions, WallpaperRepository};
pub use resource::{CachedResource, collect_states, reconcile};

#[cfg(test)]
mod persistence_tests;
