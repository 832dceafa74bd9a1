//! Adapter contract tests through the public API.
//!
//! Every adapter must route its request through the resilient caller: retries
//! on transient failures, bookkeeping in the shared tracker, and failures as
//! `CallOutcome::Error` tagged with the adapter's provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use wallfeed_core::{CallOutcome, ProviderId, SearchFilters, WallpaperProvider};
use wallfeed_fetch::{FetchContext, FetchSettings, Request, Transport, TransportError};
use wallfeed_providers::{ApiKeys, ProviderRegistry, RegistryOptions};

#[derive(Debug)]
struct Replay {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<u32>,
}

impl Replay {
    fn with(responses: Vec<Result<Value, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Transport for Replay {
    async fn get_json(&self, _request: &Request) -> Result<Value, TransportError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("connection refused".to_string())))
    }
}

fn registry(transport: Arc<Replay>) -> (FetchContext, ProviderRegistry) {
    let ctx = FetchContext::builder()
        .transport(transport)
        .settings(FetchSettings::default())
        .build()
        .unwrap();
    let options = RegistryOptions {
        keys: ApiKeys::new()
            .with(ProviderId::Unsplash, "u")
            .with(ProviderId::Pexels, "p")
            .with(ProviderId::Pixabay, "x"),
        ..Default::default()
    };
    let registry = ProviderRegistry::new(&ctx, &options);
    (ctx, registry)
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_with_backoff() {
    let transport = Replay::with(vec![
        Err(TransportError::http(502, "Bad Gateway")),
        Err(TransportError::Io("timed out".to_string())),
        Ok(json!({ "photos": [{ "id": 1, "src": { "original": "https://img/1" } }] })),
    ]);
    let (ctx, registry) = registry(Arc::clone(&transport));
    let pexels = registry.get(ProviderId::Pexels).unwrap();

    let start = tokio::time::Instant::now();
    let outcome = pexels.get_featured(1, 10).await;

    assert_eq!(outcome.into_success().unwrap()[0].id, "pexels_1");
    assert_eq!(transport.calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(3000));

    let stats = ctx.tracker.stats_for(ProviderId::Pexels);
    assert_eq!((stats.calls, stats.successes, stats.errors), (3, 1, 2));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_as_error() {
    let transport = Replay::with(Vec::new());
    let (ctx, registry) = registry(Arc::clone(&transport));
    let wallhaven = registry.get(ProviderId::Wallhaven).unwrap();

    let outcome = wallhaven.search("mountains", 1, 24, &SearchFilters::new()).await;
    let err = outcome.failure().unwrap();
    assert_eq!(err.provider, ProviderId::Wallhaven);
    assert_eq!(err.code, None);
    assert_eq!(transport.calls(), 3);
    assert_eq!(ctx.tracker.stats_for(ProviderId::Wallhaven).errors, 3);
}

#[tokio::test(start_paused = true)]
async fn quota_exhaustion_short_circuits_every_adapter() {
    let transport = Replay::with(Vec::new());
    let (ctx, registry) = registry(Arc::clone(&transport));

    for _ in 0..ctx.settings.quotas.get(ProviderId::Unsplash).unwrap() {
        ctx.tracker.record_call(ProviderId::Unsplash);
    }

    let unsplash = registry.get(ProviderId::Unsplash).unwrap();
    let outcome = unsplash.get_random(1, None).await;
    assert_eq!(outcome.failure().unwrap().code, Some(429));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn every_adapter_reports_its_own_provider() {
    let transport = Replay::with(Vec::new());
    let (_ctx, registry) = registry(transport);
    assert_eq!(registry.ids().len(), 4);
    for id in registry.ids() {
        assert_eq!(registry.get(id).unwrap().provider_id(), id);
    }
}

#[tokio::test]
async fn foreign_ids_are_not_found_everywhere() {
    let transport = Replay::with(Vec::new());
    let (_ctx, registry) = registry(Arc::clone(&transport));
    let unsplash = registry.get(ProviderId::Unsplash).unwrap();
    assert_eq!(unsplash.get_by_id("wallhaven_abc").await, CallOutcome::Success(None));
    assert_eq!(transport.calls(), 0);
}
