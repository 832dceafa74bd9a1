//! Pexels adapter.

use async_trait::async_trait;
use tracing::instrument;
use wallfeed_core::{
    CallOutcome, Collection, Page, ProviderId, SearchFilters, Wallpaper, WallpaperProvider,
};
use wallfeed_fetch::FetchContext;

use super::api::{self, PexelsCollectionPage, PexelsMediaPage, PexelsPhoto, PexelsPhotoPage};
use super::mapper::{map_collection, map_photo};
use crate::client::{ApiClient, apply_filters, clock_page, own_native_id};

const MISSING_KEY: &str = "Pexels API key is not configured";

/// Pexels adapter.
#[derive(Debug, Clone)]
pub struct PexelsAdapter {
    client: ApiClient,
    api_key: Option<String>,
}

impl PexelsAdapter {
    /// Creates the adapter. Every call fails without an API key.
    pub fn new(ctx: &FetchContext, api_key: Option<String>) -> Self {
        Self {
            client: ApiClient::new(ProviderId::Pexels, ctx),
            api_key,
        }
    }

    async fn photo_page(&self, request: wallfeed_fetch::Request) -> CallOutcome<Vec<Wallpaper>> {
        self.client
            .fetch::<PexelsPhotoPage>(request)
            .await
            .map(|page| page.photos.into_iter().map(map_photo).collect())
    }
}

#[async_trait]
impl WallpaperProvider for PexelsAdapter {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Pexels
    }

    #[instrument(skip(self))]
    async fn get_featured(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.photo_page(api::curated(key, Page::new(page, per_page))).await
    }

    #[instrument(skip(self, filters))]
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        filters: &SearchFilters,
    ) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        let request = apply_filters(
            api::search(key, query, Page::new(page, per_page)),
            filters,
            api::SEARCH_FILTERS,
        );
        self.photo_page(request).await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> CallOutcome<Option<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Pexels, id) else {
            return CallOutcome::Success(None);
        };
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch_optional::<PexelsPhoto>(api::photo(key, native))
            .await
            .map(|photo| photo.map(map_photo))
    }

    /// Pexels has no random endpoint: a clock-chosen curated page, or a
    /// search page when a category is given.
    #[instrument(skip(self))]
    async fn get_random(&self, count: u32, category: Option<&str>) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        let page = Page::new(clock_page(api::RANDOM_PAGE_SPAN), count);
        let request = match category {
            Some(category) => api::search(key, category, page),
            None => api::curated(key, page),
        };
        self.photo_page(request).await
    }

    #[instrument(skip(self))]
    async fn get_collections(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Collection>> {
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch::<PexelsCollectionPage>(api::featured_collections(key, Page::new(page, per_page)))
            .await
            .map(|page| page.collections.into_iter().map(map_collection).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_collection(
        &self,
        collection_id: &str,
        page: u32,
        per_page: u32,
    ) -> CallOutcome<Vec<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Pexels, collection_id) else {
            return CallOutcome::Success(Vec::new());
        };
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch::<PexelsMediaPage>(api::collection_media(key, native, Page::new(page, per_page)))
            .await
            .map(|page| page.media.into_iter().map(map_photo).collect())
    }
}
