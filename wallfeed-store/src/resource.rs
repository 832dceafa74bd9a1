//! Offline-first resource reconciler.
//!
//! [`reconcile`] turns a [`CachedResource`] into a short, lazy stream of
//! [`CallOutcome`] states: whatever the cache holds first (or `Loading`),
//! then the remote result. One invocation performs at most one remote
//! fetch, no matter how the stream is consumed.
//!
//! ```text
//! read cache ─┬─ hit  ─> Success(cached) ─┐
//!             └─ miss ─> Loading ─────────┤
//!                                         v
//!                               should_fetch(cached)?
//!                                  no ─> end
//!                                  yes ─> fetch_remote
//!                                          ├─ Success(r) ─> write, map ─> Success(mapped)
//!                                          ├─ Error(e)   ─> Error(e)
//!                                          ├─ Loading    ─> end
//!                                          └─ Err(e)     ─> on_fetch_failed ─> Error
//! ```

use async_trait::async_trait;
use futures::{Stream, StreamExt, stream};
use tracing::{debug, warn};
use wallfeed_core::{CallOutcome, ProviderId};

use crate::error::StoreError;

// ============================================================================
// Cached Resource
// ============================================================================

/// The collaborators of one reconciliation cycle.
#[async_trait]
pub trait CachedResource: Send + Sync {
    /// Value held in the cache and emitted to callers.
    type Local: Clone + Send + Sync;
    /// Value produced by the remote call.
    type Remote: Send;

    /// Current cached value, if any.
    async fn read_cache(&self) -> Option<Self::Local>;

    /// Whether to go to the network given what the cache holds.
    fn should_fetch(&self, _cached: Option<&Self::Local>) -> bool {
        true
    }

    /// Performs the remote call.
    ///
    /// An `Err` means the call raised instead of producing an outcome.
    async fn fetch_remote(&self) -> Result<CallOutcome<Self::Remote>, StoreError>;

    /// Stores a fresh remote value.
    async fn write_cache(&self, remote: &Self::Remote) -> Result<(), StoreError>;

    /// Converts a remote value into the emitted form.
    fn map_to_local(&self, remote: Self::Remote) -> Self::Local;

    /// Called when the fetch or the cache write raised.
    fn on_fetch_failed(&self, _error: &StoreError) {}
}

// ============================================================================
// Reconciler
// ============================================================================

enum Phase<L> {
    ReadCache,
    Fetch(Option<L>),
    Done,
}

/// Runs one reconciliation cycle as a lazy stream.
///
/// Nothing happens until the stream is polled. Dropping it early stops
/// further work; the remote fetch only starts once the second state is
/// requested.
pub fn reconcile<R>(resource: R) -> impl Stream<Item = CallOutcome<R::Local>> + Send
where
    R: CachedResource,
{
    stream::unfold((resource, Phase::ReadCache), |(resource, phase)| async move {
        match phase {
            Phase::ReadCache => {
                let cached = resource.read_cache().await;
                let first = match &cached {
                    Some(value) => CallOutcome::Success(value.clone()),
                    None => CallOutcome::Loading,
                };
                debug!(cached = cached.is_some(), "Reconciler read cache");
                Some((first, (resource, Phase::Fetch(cached))))
            }
            Phase::Fetch(cached) => {
                if !resource.should_fetch(cached.as_ref()) {
                    debug!("Reconciler skipping remote fetch");
                    return None;
                }
                let outcome = fetch_and_store(&resource).await?;
                Some((outcome, (resource, Phase::Done)))
            }
            Phase::Done => None,
        }
    })
}

/// Fetches, writes, and maps. `None` when there is nothing to emit.
async fn fetch_and_store<R: CachedResource>(resource: &R) -> Option<CallOutcome<R::Local>> {
    let remote = match resource.fetch_remote().await {
        Ok(CallOutcome::Success(remote)) => remote,
        Ok(CallOutcome::Error(err)) => {
            debug!(provider = %err.provider, code = ?err.code, "Remote fetch returned an error");
            return Some(CallOutcome::Error(err));
        }
        Ok(CallOutcome::Loading) => {
            debug!("Remote fetch returned Loading, nothing to emit");
            return None;
        }
        Err(e) => return Some(raised(resource, &e)),
    };

    if let Err(e) = resource.write_cache(&remote).await {
        return Some(raised(resource, &e));
    }
    Some(CallOutcome::Success(resource.map_to_local(remote)))
}

fn raised<R: CachedResource>(resource: &R, error: &StoreError) -> CallOutcome<R::Local> {
    warn!(error = %error, "Reconciliation failed");
    resource.on_fetch_failed(error);
    CallOutcome::error(ProviderId::default(), error.to_string())
}

/// Drains a reconciler stream into the list of emitted states.
pub async fn collect_states<S>(states: S) -> Vec<S::Item>
where
    S: Stream,
{
    states.collect().await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use wallfeed_core::ProviderError;

    type Remote = Result<CallOutcome<Vec<u32>>, StoreError>;

    #[derive(Default)]
    struct Shared {
        cache: Mutex<Option<Vec<u32>>>,
        events: Mutex<Vec<&'static str>>,
        fetches: AtomicU32,
        failures: Mutex<Vec<String>>,
    }

    impl Shared {
        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }

        fn log(&self, event: &'static str) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct Fake {
        shared: Arc<Shared>,
        remote: Mutex<Option<Remote>>,
        fetch: bool,
        fail_write: bool,
    }

    impl Fake {
        fn new(shared: &Arc<Shared>, remote: Remote) -> Self {
            Self {
                shared: Arc::clone(shared),
                remote: Mutex::new(Some(remote)),
                fetch: true,
                fail_write: false,
            }
        }

        fn no_fetch(mut self) -> Self {
            self.fetch = false;
            self
        }

        fn failing_write(mut self) -> Self {
            self.fail_write = true;
            self
        }
    }

    #[async_trait]
    impl CachedResource for Fake {
        type Local = Vec<u32>;
        type Remote = Vec<u32>;

        async fn read_cache(&self) -> Option<Vec<u32>> {
            self.shared.log("read");
            self.shared.cache.lock().unwrap().clone()
        }

        fn should_fetch(&self, _cached: Option<&Vec<u32>>) -> bool {
            self.shared.log("should_fetch");
            self.fetch
        }

        async fn fetch_remote(&self) -> Result<CallOutcome<Vec<u32>>, StoreError> {
            self.shared.log("fetch");
            self.shared.fetches.fetch_add(1, Ordering::SeqCst);
            self.remote
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(CallOutcome::Loading))
        }

        async fn write_cache(&self, remote: &Vec<u32>) -> Result<(), StoreError> {
            self.shared.log("write");
            if self.fail_write {
                return Err(StoreError::Cache("disk full".into()));
            }
            *self.shared.cache.lock().unwrap() = Some(remote.clone());
            Ok(())
        }

        fn map_to_local(&self, remote: Vec<u32>) -> Vec<u32> {
            self.shared.log("map");
            remote
        }

        fn on_fetch_failed(&self, error: &StoreError) {
            self.shared.failures.lock().unwrap().push(error.to_string());
        }
    }

    fn cached(shared: &Arc<Shared>, value: Vec<u32>) {
        *shared.cache.lock().unwrap() = Some(value);
    }

    #[tokio::test]
    async fn test_empty_cache_then_success() {
        let shared = Arc::new(Shared::default());
        let states = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![1, 2]))))).await;

        assert_eq!(states, vec![CallOutcome::Loading, CallOutcome::Success(vec![1, 2])]);
        assert_eq!(shared.events(), vec!["read", "should_fetch", "fetch", "write", "map"]);
    }

    #[tokio::test]
    async fn test_cached_value_then_fresh_value() {
        let shared = Arc::new(Shared::default());
        cached(&shared, vec![7]);
        let states = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![8]))))).await;

        assert_eq!(states, vec![CallOutcome::Success(vec![7]), CallOutcome::Success(vec![8])]);
        assert_eq!(*shared.cache.lock().unwrap(), Some(vec![8]));
    }

    #[tokio::test]
    async fn test_no_fetch_is_idempotent() {
        let shared = Arc::new(Shared::default());
        cached(&shared, vec![3]);

        let first = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![9]))).no_fetch())).await;
        let second = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![9]))).no_fetch())).await;

        assert_eq!(first, vec![CallOutcome::Success(vec![3])]);
        assert_eq!(first, second);
        assert_eq!(shared.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_cache_without_fetch_only_loads() {
        let shared = Arc::new(Shared::default());
        let states = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![]))).no_fetch())).await;
        assert_eq!(states, vec![CallOutcome::Loading]);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_cached_value() {
        let shared = Arc::new(Shared::default());
        cached(&shared, vec![5]);
        let err = ProviderError::with_code(ProviderId::Pexels, 429, "rate limit exceeded");
        let states = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Error(err.clone()))))).await;

        assert_eq!(states, vec![CallOutcome::Success(vec![5]), CallOutcome::Error(err)]);
        assert!(!shared.events().contains(&"write"));
        assert_eq!(*shared.cache.lock().unwrap(), Some(vec![5]));
    }

    #[tokio::test]
    async fn test_remote_loading_emits_nothing() {
        let shared = Arc::new(Shared::default());
        let states = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Loading)))).await;
        assert_eq!(states, vec![CallOutcome::Loading]);
        assert_eq!(shared.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_raised_fetch_calls_hook() {
        let shared = Arc::new(Shared::default());
        let fake = Fake::new(&shared, Err(StoreError::FetchFailed("socket closed".into())));
        let states = collect_states(reconcile(fake)).await;

        assert_eq!(states.len(), 2);
        let err = states[1].failure().unwrap();
        assert_eq!(err.provider, ProviderId::default());
        assert_eq!(err.code, None);
        assert!(err.message.contains("socket closed"));
        assert_eq!(shared.failures.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_is_reported_not_mapped() {
        let shared = Arc::new(Shared::default());
        let fake = Fake::new(&shared, Ok(CallOutcome::Success(vec![1]))).failing_write();
        let states = collect_states(reconcile(fake)).await;

        assert!(states[1].failure().unwrap().message.contains("disk full"));
        assert!(!shared.events().contains(&"map"));
        assert_eq!(shared.failures.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let shared = Arc::new(Shared::default());
        let fake = Fake::new(&shared, Ok(CallOutcome::Success(vec![1])));
        let mut states = std::pin::pin!(reconcile(fake));
        assert!(shared.events().is_empty());

        assert_eq!(states.next().await, Some(CallOutcome::Loading));
        assert_eq!(shared.events(), vec!["read"]);
        assert_eq!(shared.fetches.load(Ordering::SeqCst), 0);

        drop(states);
        assert_eq!(shared.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_written_value_is_read_back() {
        let shared = Arc::new(Shared::default());
        let first = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![4, 2]))))).await;
        let second = collect_states(reconcile(Fake::new(&shared, Ok(CallOutcome::Loading)).no_fetch())).await;

        assert_eq!(first.last(), second.first());
    }

    #[tokio::test]
    async fn test_at_most_one_fetch_per_cycle() {
        let shared = Arc::new(Shared::default());
        let mut states = std::pin::pin!(reconcile(Fake::new(&shared, Ok(CallOutcome::Success(vec![1])))));
        let mut emitted = 0;
        while states.next().await.is_some() {
            emitted += 1;
        }
        assert_eq!(emitted, 2);
        assert_eq!(shared.fetches.load(Ordering::SeqCst), 1);
    }
}
