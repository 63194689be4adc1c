//! In-memory query client.
//!
//! Each cached query is an entry keyed by [`QueryKey`] holding the last
//! payload as JSON, the fetcher that produces it and a watch channel that
//! observers subscribe to. Concurrent reads of the same key share one
//! request through a per-key fetch lock.
//!
//! Entries with no observer, no fetch in flight and no use for longer than
//! their `gc_time` are swept whenever a query is registered.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use rollcall_config::QueryConfig;
use rollcall_core::ClientError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::invalidation::Mutation;
use crate::key::QueryKey;
use crate::options::QueryOptions;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Produces the payload of a query, already converted to JSON.
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Value, ClientError>> + Send + Sync>;

/// Wraps a typed async function as a [`Fetcher`].
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher
where
    T: Serialize + Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = f();
        async move {
            let value = fut.await?;
            Ok(serde_json::to_value(value)?)
        }
        .boxed()
    })
}

/// Snapshot of one cached query.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub data: Option<Value>,
    /// Error of the latest fetch. Previous data is kept alongside it.
    pub error: Option<ClientError>,
    pub updated_at: Option<Instant>,
    pub is_fetching: bool,
    pub is_invalidated: bool,
}

impl QueryState {
    /// No data yet and a fetch in flight.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.is_fetching
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.is_invalidated
            && self.data.is_some()
            && self
                .updated_at
                .is_some_and(|updated| updated.elapsed() < stale_time)
    }
}

struct Entry {
    state: watch::Sender<QueryState>,
    fetcher: Option<Fetcher>,
    options: QueryOptions,
    fetch_lock: Arc<AsyncMutex<()>>,
    generation: u64,
    polling: bool,
    last_used: Instant,
}

impl Entry {
    fn new(options: QueryOptions) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            state,
            fetcher: None,
            options,
            fetch_lock: Arc::new(AsyncMutex::new(())),
            generation: 0,
            polling: false,
            last_used: Instant::now(),
        }
    }

    fn is_collectable(&self) -> bool {
        self.state.receiver_count() == 0
            && !self.polling
            && Arc::strong_count(&self.fetch_lock) == 1
            && self.last_used.elapsed() >= self.options.gc_time
    }

    fn fresh_data(&self) -> Option<Value> {
        let state = self.state.borrow();
        if state.is_fresh(self.options.stale_time) {
            state.data.clone()
        } else {
            None
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    config: QueryConfig,
    retry_delay: Duration,
}

/// Shared handle to the query cache. Clones share the same entries.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self::with_retry_delay(config, DEFAULT_RETRY_DELAY)
    }

    /// Builds a client whose first retry waits `retry_delay`; later
    /// retries double it up to 30 seconds.
    pub fn with_retry_delay(config: QueryConfig, retry_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                config,
                retry_delay,
            }),
        }
    }

    /// Options for queries without their own stale time.
    pub fn default_options(&self) -> QueryOptions {
        QueryOptions::stale(self.inner.config.stale_time)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, key: &QueryKey, options: QueryOptions, fetcher: Fetcher) -> Option<Value> {
        let mut entries = self.entries();
        Self::sweep(&mut entries);
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(options));
        entry.fetcher = Some(fetcher);
        entry.options = options;
        entry.last_used = Instant::now();
        entry.fresh_data()
    }

    fn sweep(entries: &mut HashMap<QueryKey, Entry>) {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_collectable());
        let collected = before - entries.len();
        if collected > 0 {
            debug!(collected, "unused queries collected");
        }
    }

    /// Drops every idle entry past its `gc_time`. Returns how many went.
    pub fn collect_garbage(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        Self::sweep(&mut entries);
        before - entries.len()
    }

    /// Returns cached data while fresh, otherwise fetches it.
    ///
    /// Concurrent calls for the same key wait on a single request.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: Fetcher,
    ) -> Result<T, ClientError> {
        let value = self.fetch_value(key, options, fetcher).await?;
        Ok(serde_json::from_value(value)?)
    }

    #[instrument(skip(self, options, fetcher), fields(query.key = %key))]
    pub async fn fetch_value(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: Fetcher,
    ) -> Result<Value, ClientError> {
        if let Some(data) = self.register(key, options, fetcher) {
            metrics::counter!("query_cache_hits_total", "resource" => key.resource().to_string())
                .increment(1);
            return Ok(data);
        }

        metrics::counter!("query_cache_misses_total", "resource" => key.resource().to_string())
            .increment(1);
        self.load(key, false).await
    }

    /// Fetches regardless of freshness, using the registered fetcher.
    pub async fn refetch(&self, key: &QueryKey) -> Result<Value, ClientError> {
        self.load(key, true).await
    }

    async fn load(&self, key: &QueryKey, force: bool) -> Result<Value, ClientError> {
        let lock = {
            let entries = self.entries();
            let entry = entries.get(key).ok_or(ClientError::Cancelled)?;
            Arc::clone(&entry.fetch_lock)
        };
        let _guard = lock.lock().await;

        let (fetcher, retry, generation) = {
            let entries = self.entries();
            let entry = entries.get(key).ok_or(ClientError::Cancelled)?;
            if !force {
                if let Some(data) = entry.fresh_data() {
                    return Ok(data);
                }
            }
            let fetcher = entry.fetcher.clone().ok_or(ClientError::Cancelled)?;
            let retry = entry.options.retry.unwrap_or(self.inner.config.retry);
            entry.state.send_modify(|state| state.is_fetching = true);
            (fetcher, retry, entry.generation)
        };

        let started = Instant::now();
        let result = self.run_with_retry(key, &fetcher, retry).await;
        metrics::histogram!("query_fetch_duration_seconds", "resource" => key.resource().to_string())
            .record(started.elapsed().as_secs_f64());

        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            return Err(ClientError::Cancelled);
        };
        entry.last_used = Instant::now();
        // An invalidation that landed mid-flight keeps the entry stale so the
        // queued refetch still runs.
        let invalidated_meanwhile = entry.generation != generation;
        entry.state.send_modify(|state| {
            state.is_fetching = false;
            match &result {
                Ok(value) => {
                    state.data = Some(value.clone());
                    state.error = None;
                    state.updated_at = Some(Instant::now());
                    state.is_invalidated = invalidated_meanwhile;
                }
                Err(err) => state.error = Some(err.clone()),
            }
        });

        result
    }

    async fn run_with_retry(
        &self,
        key: &QueryKey,
        fetcher: &Fetcher,
        retry: u32,
    ) -> Result<Value, ClientError> {
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < retry && err.is_retryable() => {
                    attempt += 1;
                    let delay = self.retry_delay(attempt);
                    debug!(query.key = %key, attempt, error = %err, ?delay, "retrying query");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    metrics::counter!("query_fetch_errors_total", "resource" => key.resource().to_string())
                        .increment(1);
                    debug!(query.key = %key, error = %err, "query failed");
                    return Err(err);
                }
            }
        }
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.inner
            .retry_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY)
    }

    /// Subscribes to a query, fetching it in the background when it is not
    /// fresh and polling when `options.refetch_interval` is set.
    pub fn observe<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: Fetcher,
    ) -> QueryObserver<T> {
        let (receiver, needs_fetch) = {
            let mut entries = self.entries();
            Self::sweep(&mut entries);
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(options));
            entry.fetcher = Some(fetcher);
            entry.options = options;
            entry.last_used = Instant::now();
            (entry.state.subscribe(), entry.fresh_data().is_none())
        };

        if needs_fetch {
            self.spawn_load(key.clone(), false);
        }
        if let Some(interval) = options.refetch_interval {
            self.poll(key, interval);
        }

        QueryObserver {
            key: key.clone(),
            receiver,
            client: Arc::downgrade(&self.inner),
            _marker: PhantomData,
        }
    }

    fn spawn_load(&self, key: QueryKey, force: bool) {
        let Ok(handle) = Handle::try_current() else {
            debug!(query.key = %key, "no runtime, background fetch skipped");
            return;
        };
        let client = self.clone();
        handle.spawn(async move {
            if let Err(err) = client.load(&key, force).await {
                debug!(query.key = %key, error = %err, "background fetch failed");
            }
        });
    }

    /// Refetches `key` every `interval` while at least one observer is alive.
    pub fn poll(&self, key: &QueryKey, interval: Duration) {
        let Ok(handle) = Handle::try_current() else {
            return;
        };
        {
            let mut entries = self.entries();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            if entry.polling {
                return;
            }
            entry.polling = true;
        }

        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = key.clone();
        handle.spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let client = QueryClient { inner };
                if !client.has_observers(&key) {
                    client.stop_polling(&key);
                    debug!(query.key = %key, "polling stopped");
                    break;
                }
                if let Err(err) = client.load(&key, true).await {
                    debug!(query.key = %key, error = %err, "poll failed");
                }
            }
        });
    }

    fn stop_polling(&self, key: &QueryKey) {
        if let Some(entry) = self.entries().get_mut(key) {
            entry.polling = false;
        }
    }

    pub fn has_observers(&self, key: &QueryKey) -> bool {
        self.entries()
            .get(key)
            .is_some_and(|entry| entry.state.receiver_count() > 0)
    }

    /// Marks every entry under `prefix` stale and refetches the observed ones.
    ///
    /// Returns how many entries matched.
    #[instrument(skip(self), fields(query.prefix = %prefix))]
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut matched = 0;
        let mut observed = Vec::new();
        {
            let mut entries = self.entries();
            for (key, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
                matched += 1;
                entry.generation += 1;
                entry.state.send_modify(|state| state.is_invalidated = true);
                if entry.state.receiver_count() > 0 && entry.fetcher.is_some() {
                    observed.push(key.clone());
                }
            }
        }

        debug!(matched, refetching = observed.len(), "invalidated queries");
        for key in observed {
            self.spawn_load(key, false);
        }
        matched
    }

    /// Runs a mutation and, if it succeeds, invalidates what it affects.
    ///
    /// A failed mutation leaves the cache untouched.
    #[instrument(skip(self, operation), fields(mutation = mutation.name()))]
    pub async fn mutate<T, Fut>(&self, mutation: Mutation, operation: Fut) -> Result<T, ClientError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let result = operation.await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!("mutations_total", "mutation" => mutation.name(), "status" => status)
            .increment(1);

        match &result {
            Ok(_) => {
                for prefix in mutation.invalidates() {
                    self.invalidate(&prefix);
                }
            }
            Err(err) => debug!(error = %err, "mutation failed"),
        }
        result
    }

    /// Cached data for `key`, fresh or not.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.entries().get(key)?.state.borrow().data.clone()?;
        serde_json::from_value(value).ok()
    }

    pub fn state(&self, key: &QueryKey) -> Option<QueryState> {
        self.entries()
            .get(key)
            .map(|entry| entry.state.borrow().clone())
    }

    /// Whether the next read of `key` would hit the network.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries()
            .get(key)
            .is_none_or(|entry| entry.fresh_data().is_none())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drops every entry. In-flight fetches resolve to [`ClientError::Cancelled`].
    pub fn clear(&self) {
        let mut entries = self.entries();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "query cache cleared");
    }
}

/// Live view of one query.
///
/// Dropping the observer unsubscribes; polling stops once no observer
/// remains and the entry becomes collectable `gc_time` later.
pub struct QueryObserver<T> {
    key: QueryKey,
    receiver: watch::Receiver<QueryState>,
    client: Weak<Inner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        let Some(inner) = self.client.upgrade() else {
            return;
        };
        let mut entries = inner.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(&self.key) {
            entry.last_used = Instant::now();
        }
    }
}

impl<T: DeserializeOwned> QueryObserver<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn state(&self) -> QueryState {
        self.receiver.borrow().clone()
    }

    /// Current data, decoded.
    pub fn data(&self) -> Option<Result<T, ClientError>> {
        let value = self.receiver.borrow().data.clone()?;
        Some(serde_json::from_value(value).map_err(ClientError::from))
    }

    /// Waits for the next state change.
    pub async fn changed(&mut self) -> Result<(), ClientError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| ClientError::Cancelled)
    }

    /// Waits until the query has up-to-date data, or its fetch failed.
    pub async fn settled(&mut self) -> Result<T, ClientError> {
        loop {
            {
                let state = self.receiver.borrow_and_update();
                if !state.is_fetching {
                    match (&state.data, &state.error) {
                        (Some(data), _) if !state.is_invalidated => {
                            return Ok(serde_json::from_value(data.clone())?);
                        }
                        (_, Some(err)) => return Err(err.clone()),
                        _ => {}
                    }
                }
            }
            self.changed().await?;
        }
    }

    /// Waits until the data satisfies `predicate`.
    pub async fn wait_for(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Result<T, ClientError> {
        loop {
            let data = self.receiver.borrow_and_update().data.clone();
            if let Some(value) = data {
                let decoded: T = serde_json::from_value(value)?;
                if predicate(&decoded) {
                    return Ok(decoded);
                }
            }
            self.changed().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use rollcall_models::DepartmentId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(counter: Arc<AtomicUsize>) -> Fetcher {
        fetcher(move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok::<_, ClientError>(vec![format!("v{}", n)])
            }
        })
    }

    fn client() -> QueryClient {
        QueryClient::with_retry_delay(QueryConfig::default(), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_fresh_data_served_from_cache() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = keys::departments::lists();
        let options = QueryOptions::stale(Duration::from_secs(60));

        let first: Vec<String> = client
            .fetch(&key, options, counting_fetcher(calls.clone()))
            .await
            .unwrap();
        let second: Vec<String> = client
            .fetch(&key, options, counting_fetcher(calls.clone()))
            .await
            .unwrap();

        assert_eq!(first, vec!["v1"]);
        assert_eq!(second, vec!["v1"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!client.is_stale(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_data_refetched() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = keys::departments::lists();
        let options = QueryOptions::stale(Duration::from_secs(30));

        let _: Vec<String> = client
            .fetch(&key, options, counting_fetcher(calls.clone()))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(client.is_stale(&key));

        let again: Vec<String> = client
            .fetch(&key, options, counting_fetcher(calls.clone()))
            .await
            .unwrap();
        assert_eq!(again, vec!["v2"]);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = keys::departments::lists();
        let options = QueryOptions::default();

        let (a, b) = tokio::join!(
            client.fetch::<Vec<String>>(&key, options, counting_fetcher(calls.clone())),
            client.fetch::<Vec<String>>(&key, options, counting_fetcher(calls.clone())),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_matches_prefix() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let id = DepartmentId::new("d1");
        let options = QueryOptions::default();

        for key in [keys::departments::lists(), keys::departments::detail(&id)] {
            let _: Vec<String> = client
                .fetch(&key, options, counting_fetcher(calls.clone()))
                .await
                .unwrap();
        }

        assert_eq!(client.invalidate(&keys::departments::lists()), 1);
        assert!(client.is_stale(&keys::departments::lists()));
        assert!(!client.is_stale(&keys::departments::detail(&id)));

        assert_eq!(client.invalidate(&keys::departments::all()), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_retried_once() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let flaky = fetcher(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ClientError::Network("connection reset".into()))
                } else {
                    Ok(1u32)
                }
            }
        });

        let value: u32 = client
            .fetch(&keys::users::all(), QueryOptions::default(), flaky)
            .await
            .unwrap();
        assert_eq!(value, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_domain_errors_not_retried() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rejecting = fetcher(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ClientError::Http {
                    status: 404,
                    message: "Not found".into(),
                })
            }
        });

        let err = client
            .fetch::<u32>(&keys::users::all(), QueryOptions::default().with_retry(3), rejecting)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(client.state(&keys::users::all()).unwrap().error.is_some());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_untouched() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = keys::departments::lists();
        let _: Vec<String> = client
            .fetch(&key, QueryOptions::default(), counting_fetcher(calls.clone()))
            .await
            .unwrap();

        let result: Result<(), _> = client
            .mutate(Mutation::CreateDepartment, async {
                Err(ClientError::Network("down".into()))
            })
            .await;
        assert!(result.is_err());
        assert!(!client.is_stale(&key));

        client
            .mutate(Mutation::CreateDepartment, async { Ok(()) })
            .await
            .unwrap();
        assert!(client.is_stale(&key));
    }

    #[tokio::test]
    async fn test_observer_refetches_after_invalidation() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = keys::sessions::lists();

        let mut observer: QueryObserver<Vec<String>> =
            client.observe(&key, QueryOptions::default(), counting_fetcher(calls.clone()));
        assert_eq!(observer.settled().await.unwrap(), vec!["v1"]);

        client.invalidate(&keys::sessions::all());
        let refreshed = observer.wait_for(|data| data[0] == "v2").await.unwrap();
        assert_eq!(refreshed, vec!["v2"]);
    }

    #[tokio::test]
    async fn test_clear_drops_entries() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let _: Vec<String> = client
            .fetch(&keys::users::all(), QueryOptions::default(), counting_fetcher(calls))
            .await
            .unwrap();
        assert_eq!(client.len(), 1);

        client.clear();
        assert!(client.is_empty());
        assert!(client.get_query_data::<Vec<String>>(&keys::users::all()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_entries_collected_after_gc_time() {
        let client = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::default().with_gc_time(Duration::from_secs(60));

        for id in ["d1", "d2", "d3"] {
            let _: Vec<String> = client
                .fetch(
                    &keys::departments::detail(&DepartmentId::new(id)),
                    options,
                    counting_fetcher(calls.clone()),
                )
                .await
                .unwrap();
        }
        let mut observer: QueryObserver<Vec<String>> =
            client.observe(&keys::departments::lists(), options, counting_fetcher(calls.clone()));
        observer.settled().await.unwrap();
        assert_eq!(client.len(), 4);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(client.collect_garbage(), 0);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(client.collect_garbage(), 3);
        assert_eq!(client.len(), 1);

        drop(observer);
        assert_eq!(client.collect_garbage(), 0);
        tokio::time::advance(Duration::from_secs(61)).await;

        let _: Vec<String> = client
            .fetch(&keys::users::all(), options, counting_fetcher(calls.clone()))
            .await
            .unwrap();
        assert_eq!(client.len(), 1);
        assert!(client.state(&keys::departments::lists()).is_none());
    }
}
