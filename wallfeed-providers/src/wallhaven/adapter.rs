//! Wallhaven adapter.

use async_trait::async_trait;
use tracing::instrument;
use wallfeed_core::{
    CallOutcome, Collection, Page, ProviderId, SearchFilters, Wallpaper, WallpaperProvider,
};
use wallfeed_fetch::{FetchContext, Request};

use super::api::{self, WallhavenCollections, WallhavenDetail, WallhavenListing};
use super::mapper::{map_collection, map_wallpaper};
use crate::client::{ApiClient, apply_filters, own_native_id};

/// Wallhaven adapter.
#[derive(Debug, Clone)]
pub struct WallhavenAdapter {
    client: ApiClient,
    api_key: Option<String>,
    username: Option<String>,
}

impl WallhavenAdapter {
    /// Creates the adapter. The key is optional except for collections.
    pub fn new(ctx: &FetchContext, api_key: Option<String>) -> Self {
        Self {
            client: ApiClient::new(ProviderId::Wallhaven, ctx),
            api_key,
            username: None,
        }
    }

    /// Sets the account that owns the API key, used for collection ids.
    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username.filter(|u| !u.trim().is_empty());
        self
    }

    fn key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    async fn listing(&self, request: Request, limit: u32) -> CallOutcome<Vec<Wallpaper>> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        self.client
            .fetch::<WallhavenListing>(request)
            .await
            .map(|listing| listing.data.into_iter().take(limit).map(map_wallpaper).collect())
    }

    /// Splits `"{username}/{id}"`, falling back to the configured account.
    fn collection_path<'a>(&'a self, native: &'a str) -> Option<(&'a str, &'a str)> {
        match native.split_once('/') {
            Some((user, id)) if !user.is_empty() && !id.is_empty() => Some((user, id)),
            Some(_) => None,
            None => self.username.as_deref().map(|user| (user, native)),
        }
    }
}

#[async_trait]
impl WallpaperProvider for WallhavenAdapter {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Wallhaven
    }

    /// Wallhaven pages are fixed at 24; results are trimmed to `per_page`.
    #[instrument(skip(self))]
    async fn get_featured(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Wallpaper>> {
        let page = Page::new(page, per_page);
        self.listing(api::toplist(self.key(), page.page), page.per_page)
            .await
    }

    #[instrument(skip(self, filters))]
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        filters: &SearchFilters,
    ) -> CallOutcome<Vec<Wallpaper>> {
        let page = Page::new(page, per_page);
        let request = apply_filters(
            api::search(self.key(), query, page.page),
            filters,
            api::SEARCH_FILTERS,
        );
        self.listing(request, page.per_page).await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> CallOutcome<Option<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Wallhaven, id) else {
            return CallOutcome::Success(None);
        };
        self.client
            .fetch_optional::<WallhavenDetail>(api::wallpaper(self.key(), native))
            .await
            .map(|detail| detail.map(|d| map_wallpaper(d.data)))
    }

    #[instrument(skip(self))]
    async fn get_random(&self, count: u32, category: Option<&str>) -> CallOutcome<Vec<Wallpaper>> {
        let count = count.clamp(1, api::PAGE_SIZE);
        self.listing(api::random(self.key(), category), count).await
    }

    /// Lists the key owner's collections. Needs an API key.
    #[instrument(skip(self))]
    async fn get_collections(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Collection>> {
        let Some(key) = self.key() else {
            return self.client.reject("Wallhaven API key is required for collections");
        };
        let page = Page::new(page, per_page);
        let skip = usize::try_from((page.page - 1).saturating_mul(page.per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(page.per_page).unwrap_or(usize::MAX);
        let username = self.username.as_deref();

        // The endpoint is not paginated; paging is applied locally.
        self.client
            .fetch::<WallhavenCollections>(api::collections(key))
            .await
            .map(|collections| {
                collections
                    .data
                    .into_iter()
                    .skip(skip)
                    .take(take)
                    .map(|c| map_collection(c, username))
                    .collect()
            })
    }

    #[instrument(skip(self))]
    async fn get_by_collection(
        &self,
        collection_id: &str,
        page: u32,
        per_page: u32,
    ) -> CallOutcome<Vec<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Wallhaven, collection_id) else {
            return CallOutcome::Success(Vec::new());
        };
        let Some((username, id)) = self.collection_path(native) else {
            return self
                .client
                .reject(format!("collection id must be username/id, got {native}"));
        };
        let page = Page::new(page, per_page);
        self.listing(
            api::collection_wallpapers(self.key(), username, id, page.page),
            page.per_page,
        )
        .await
    }
}
