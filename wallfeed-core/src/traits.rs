//! Trait definitions for Wallfeed.
//!
//! This module defines the uniform adapter contract every provider
//! implementation satisfies.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::models::{CallOutcome, Collection, ProviderId, Wallpaper};

/// Free-form search filters (`orientation`, `color`, `category`, ...).
///
/// Each adapter forwards the keys its provider understands and ignores the
/// rest.
pub type SearchFilters = BTreeMap<String, String>;

/// Uniform adapter over one upstream wallpaper provider.
///
/// Implementors are responsible for:
/// - Building the provider-specific request
/// - Running it through the resilient call wrapper, tagged with
///   [`provider_id`](Self::provider_id)
/// - Mapping native records into [`Wallpaper`] / [`Collection`] values
///
/// Adapters never panic and never return a Rust error: every failure is
/// expressed as [`CallOutcome::Error`] and passed through unchanged.
#[async_trait]
pub trait WallpaperProvider: Send + Sync {
    /// The provider this adapter talks to.
    fn provider_id(&self) -> ProviderId;

    /// Curated / editorial wallpapers.
    async fn get_featured(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Wallpaper>>;

    /// Free-text search.
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        filters: &SearchFilters,
    ) -> CallOutcome<Vec<Wallpaper>>;

    /// Looks up a single wallpaper. `Success(None)` when it does not exist.
    ///
    /// Accepts either a namespaced id or the provider's native id.
    async fn get_by_id(&self, id: &str) -> CallOutcome<Option<Wallpaper>>;

    /// Random wallpapers, optionally restricted to a category.
    async fn get_random(&self, count: u32, category: Option<&str>) -> CallOutcome<Vec<Wallpaper>>;

    /// Collections offered by the provider.
    async fn get_collections(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Collection>>;

    /// Wallpapers in a collection.
    async fn get_by_collection(
        &self,
        collection_id: &str,
        page: u32,
        per_page: u32,
    ) -> CallOutcome<Vec<Wallpaper>>;

    /// Reports a download to the provider.
    ///
    /// Providers without download tracking succeed without a request.
    async fn track_download(&self, _id: &str) -> CallOutcome<()> {
        CallOutcome::Success(())
    }
}
