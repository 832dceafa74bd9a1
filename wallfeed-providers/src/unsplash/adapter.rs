//! Unsplash adapter.

use async_trait::async_trait;
use tracing::{debug, instrument};
use wallfeed_core::{
    CallOutcome, Collection, Page, ProviderId, SearchFilters, Wallpaper, WallpaperProvider,
};
use wallfeed_fetch::FetchContext;

use super::api::{self, UnsplashCollection, UnsplashDownload, UnsplashPhoto, UnsplashSearchResponse};
use super::mapper::{map_collection, map_photo};
use crate::client::{ApiClient, apply_filters, own_native_id};

const MISSING_KEY: &str = "Unsplash access key is not configured";

/// Unsplash adapter.
#[derive(Debug, Clone)]
pub struct UnsplashAdapter {
    client: ApiClient,
    access_key: Option<String>,
}

impl UnsplashAdapter {
    /// Creates the adapter. Every call fails without an access key.
    pub fn new(ctx: &FetchContext, access_key: Option<String>) -> Self {
        Self {
            client: ApiClient::new(ProviderId::Unsplash, ctx),
            access_key,
        }
    }

    async fn photos(&self, request: wallfeed_fetch::Request) -> CallOutcome<Vec<Wallpaper>> {
        self.client
            .fetch::<Vec<UnsplashPhoto>>(request)
            .await
            .map(|photos| photos.into_iter().map(map_photo).collect())
    }
}

#[async_trait]
impl WallpaperProvider for UnsplashAdapter {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Unsplash
    }

    #[instrument(skip(self))]
    async fn get_featured(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.photos(api::featured(key, Page::new(page, per_page))).await
    }

    #[instrument(skip(self, filters))]
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        filters: &SearchFilters,
    ) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        let request = apply_filters(
            api::search(key, query, Page::new(page, per_page)),
            filters,
            api::SEARCH_FILTERS,
        );
        self.client
            .fetch::<UnsplashSearchResponse>(request)
            .await
            .map(|response| response.results.into_iter().map(map_photo).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> CallOutcome<Option<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Unsplash, id) else {
            return CallOutcome::Success(None);
        };
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch_optional::<UnsplashPhoto>(api::photo(key, native))
            .await
            .map(|photo| photo.map(map_photo))
    }

    #[instrument(skip(self))]
    async fn get_random(&self, count: u32, category: Option<&str>) -> CallOutcome<Vec<Wallpaper>> {
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.photos(api::random(key, count, category)).await
    }

    #[instrument(skip(self))]
    async fn get_collections(&self, page: u32, per_page: u32) -> CallOutcome<Vec<Collection>> {
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch::<Vec<UnsplashCollection>>(api::collections(key, Page::new(page, per_page)))
            .await
            .map(|collections| collections.into_iter().map(map_collection).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_collection(
        &self,
        collection_id: &str,
        page: u32,
        per_page: u32,
    ) -> CallOutcome<Vec<Wallpaper>> {
        let Some(native) = own_native_id(ProviderId::Unsplash, collection_id) else {
            return CallOutcome::Success(Vec::new());
        };
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.photos(api::collection_photos(key, native, Page::new(page, per_page)))
            .await
    }

    #[instrument(skip(self))]
    async fn track_download(&self, id: &str) -> CallOutcome<()> {
        let Some(native) = own_native_id(ProviderId::Unsplash, id) else {
            return CallOutcome::Success(());
        };
        let Some(key) = self.access_key.as_deref() else {
            return self.client.reject(MISSING_KEY);
        };
        self.client
            .fetch::<UnsplashDownload>(api::download(key, native))
            .await
            .map(|download| {
                debug!(url = ?download.url, "Download tracked");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, context};
    use serde_json::json;
    use wallfeed_fetch::TransportError;

    fn adapter(transport: &std::sync::Arc<ScriptedTransport>) -> UnsplashAdapter {
        UnsplashAdapter::new(&context(transport), Some("test-key".to_string()))
    }

    #[tokio::test]
    async fn test_featured_maps_every_photo() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!([
            { "id": "a", "urls": { "full": "https://img/a" } },
            { "id": "b", "urls": { "full": "https://img/b" }, "plus": true }
        ]));

        let outcome = adapter(&transport).get_featured(2, 10).await;
        let items = outcome.into_success().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "unsplash_a");
        assert!(items[1].is_premium);

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.unsplash.com/photos");
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("per_page"), Some("10"));
        assert_eq!(request.header_value("authorization"), Some("Client-ID test-key"));
    }

    #[tokio::test]
    async fn test_search_forwards_known_filters() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({ "total": 1, "results": [{ "id": "z", "urls": { "full": "u" } }] }));

        let filters = SearchFilters::from([
            ("orientation".to_string(), "portrait".to_string()),
            ("purity".to_string(), "sfw".to_string()),
        ]);
        let items = adapter(&transport)
            .search("forest", 1, 24, &filters)
            .await
            .into_success()
            .unwrap();
        assert_eq!(items[0].id, "unsplash_z");

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.unsplash.com/search/photos");
        assert_eq!(request.query_value("query"), Some("forest"));
        assert_eq!(request.query_value("orientation"), Some("portrait"));
        assert_eq!(request.query_value("purity"), None);
    }

    #[tokio::test]
    async fn test_get_by_id_strips_prefix_and_handles_missing() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({ "id": "abc", "urls": { "full": "u" } }));
        transport.push_err(TransportError::http(404, "Not Found"));

        let adapter = adapter(&transport);
        let found = adapter.get_by_id("unsplash_abc").await;
        assert_eq!(found.into_success().unwrap().unwrap().id, "unsplash_abc");
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.unsplash.com/photos/abc"
        );

        let missing = adapter.get_by_id("gone").await;
        assert_eq!(missing, CallOutcome::Success(None));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_foreign_id_makes_no_request() {
        let transport = ScriptedTransport::new();
        let outcome = adapter(&transport).get_by_id("pexels_123").await;
        assert_eq!(outcome, CallOutcome::Success(None));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_propagates_unchanged() {
        let transport = ScriptedTransport::new();
        transport.push_err(TransportError::http(403, "Rate Limit Exceeded"));

        let outcome = adapter(&transport).get_random(5, Some("nature")).await;
        let err = outcome.failure().unwrap();
        assert_eq!(err.code, Some(403));
        assert_eq!(err.provider, ProviderId::Unsplash);

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("count"), Some("5"));
        assert_eq!(request.query_value("query"), Some("nature"));
    }

    #[tokio::test]
    async fn test_track_download_hits_download_endpoint() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!({ "url": "https://images.unsplash.com/photo" }));

        let outcome = adapter(&transport).track_download("unsplash_abc").await;
        assert_eq!(outcome, CallOutcome::Success(()));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.unsplash.com/photos/abc/download"
        );
    }

    #[tokio::test]
    async fn test_collections() {
        let transport = ScriptedTransport::new();
        transport.push_ok(json!([{ "id": "206", "title": "Cats", "total_photos": 3 }]));
        transport.push_ok(json!([{ "id": "p1", "urls": { "full": "u" } }]));

        let adapter = adapter(&transport);
        let collections = adapter.get_collections(1, 10).await.into_success().unwrap();
        assert_eq!(collections[0].id, "unsplash_206");

        let items = adapter
            .get_by_collection(&collections[0].id, 1, 10)
            .await
            .into_success()
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.unsplash.com/collections/206/photos"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let transport = ScriptedTransport::new();
        let adapter = UnsplashAdapter::new(&context(&transport), None);
        let outcome = adapter.get_featured(1, 10).await;
        assert!(outcome.is_error());
        assert_eq!(transport.request_count(), 0);
    }
}
