//! Pixabay adapter.

use async_trait::async_trait;
use tracing::instrument;
use wallfeed_core::{
    CallOutcome, Collection, Page, ProviderId, SearchFilters, Wallpaper, WallpaperProvider,
};
use wallfeed_fetch::{FetchContext, Request};

use super::api::{self, PixabayResponse};
use super::mapper::map_hit;
use crate::client::{ApiClient, apply_filters, clock_page, own_native_id};

const MISSING_KEY: &str = "Pixabay API key is not configured";

/// Pixabay adapter.
#[derive(Debug, Clone)]
pub struct PixabayAdapter {
    client: ApiClient,
    api_key: Option<String>,
}

impl PixabayAdapter {
    /// Creates the adapter. Every call fails without an API key.
    pub fn new(ctx: &FetchContext, api_key: Option<String>) -> Self {
        Self {
            client: ApiClient::new(ProviderId::Pixabay, ctx),
            api_key,
        }
    }

    async fn hits(&self, request: Request, limit: u32) -> CallOutcome<Vec<Wallpaper>> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        self.client
            .fetch::<PixabayResponse>(request)
            .await
            .map(|response| response.hits.into_iter().take(limit).map(map_hit).collect())
    }
}

#[async_trait]
impl WallpaperProvider for PixabayAdapter {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Pixabay
    }

    #[instrument(skip(self))]
    async fn get_featured(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        let page = Page::new(page, per_page);
        self.hits(api::editors_choice(key, page), page.per_page).await
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
        let page = Page::new(page, per_page);
        let request = apply_filters(api::search(key, query, page), filters, api::SEARCH_FILTERS);
        self.hits(request, page.per_page).await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> CallOutcome<Option<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Pixabay, id) else {
            return CallOutcome::Success(None);
        };
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch_optional::<PixabayResponse>(api::by_id(key, native))
            .await
            .map(|response| {
                response
                    .and_then(|r| r.hits.into_iter().next())
                    .map(map_hit)
            })
    }

    #[instrument(skip(self))]
    async fn get_random(&self, count: u32, category: Option<&str>) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.api_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        let page = Page::new(clock_page(api::RANDOM_PAGE_SPAN), count);
        self.hits(api::latest(key, page, category), page.per_page).await
    }

    /// Pixabay has no collections.
    async fn get_collections(&self, _page: u32, _per_page: u32) -> CallOutcome<Vec<Collection>> {
        CallOutcome::Success(Vec::new())
    }

    async fn get_by_collection(
        &self,
        _collection_id: &str,
        _page: u32,
        _per_page: u32,
    ) -> CallOutcome<Vec<Wallpaper>> {
        CallOutcome::Success(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, context};
    use serde_json::json;
    use std::sync::Arc;

    fn adapter(transport: &Arc<ScriptedTransport>) -> PixabayAdapter {
        PixabayAdapter::new(&context(transport), Some("pix-key".to_string()))
    }

    #[tokio::test]
    async fn test_small_page_is_trimmed_to_request() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({
            "total": 3,
            "totalHits": 3,
            "hits": [{ "id": 1 }, { "id": 2 }, { "id": 3 }]
        }));

        let items = adapter(&transport).get_featured(1, 1).await.into_success().unwrap();
        assert_eq!(items.len(), 1);

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://pixabay.com/api/");
        assert_eq!(request.query_value("key"), Some("pix-key"));
        assert_eq!(request.query_value("per_page"), Some("3"));
        assert_eq!(request.query_value("editors_choice"), Some("true"));
    }

    #[tokio::test]
    async fn test_get_by_id_empty_hits_is_none() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({ "total": 0, "totalHits": 0, "hits": [] }));
        let outcome = adapter(&transport).get_by_id("pixabay_42").await;
        assert_eq!(outcome, CallOutcome::Success(None));
        assert_eq!(transport.last_request().unwrap().query_value("id"), Some("42"));
    }

    #[tokio::test]
    async fn test_collections_are_empty_without_request() {
        let transport = ScriptedTransport::new();
        let adapter = adapter(&transport);
        assert_eq!(adapter.get_collections(1, 10).await, CallOutcome::Success(Vec::new()));
        assert_eq!(
            adapter.get_by_collection("pixabay_1", 1, 10).await,
            CallOutcome::Success(Vec::new())
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_search_with_category_filter() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({ "hits": [{ "id": 9, "tags": "sea, sky" }] }));

        let filters = SearchFilters::from([("category".to_string(), "nature".to_string())]);
        let items = adapter(&transport)
            .search("sunset", 2, 20, &filters)
            .await
            .into_success()
            .unwrap();
        assert_eq!(items[0].tags, vec!["sea", "sky"]);

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("q"), Some("sunset"));
        assert_eq!(request.query_value("category"), Some("nature"));
        assert_eq!(request.query_value("page"), Some("2"));
    }
}
