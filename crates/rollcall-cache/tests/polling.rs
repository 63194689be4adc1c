use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rollcall_cache::{QueryClient, QueryObserver, QueryOptions, fetcher, keys, stale_times};
use rollcall_config::QueryConfig;
use rollcall_core::ClientError;
use rollcall_models::{Role, SessionId};

fn counting(calls: Arc<AtomicUsize>) -> rollcall_cache::Fetcher {
    fetcher(move || {
        let calls = Arc::clone(&calls);
        async move { Ok::<_, ClientError>(calls.fetch_add(1, Ordering::SeqCst) + 1) }
    })
}

#[tokio::test(start_paused = true)]
async fn test_observed_query_polls_on_interval() {
    let client = QueryClient::new(QueryConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let key = keys::dashboard::stats(Role::Admin);
    let options = QueryOptions::stale(stale_times::DASHBOARD)
        .with_refetch_interval(stale_times::DASHBOARD_POLL);

    let mut observer: QueryObserver<usize> = client.observe(&key, options, counting(calls.clone()));
    assert_eq!(observer.settled().await.unwrap(), 1);

    tokio::time::advance(stale_times::DASHBOARD_POLL + Duration::from_secs(1)).await;
    let polled = observer.wait_for(|n| *n >= 2).await.unwrap();
    assert_eq!(polled, 2);
}

#[tokio::test(start_paused = true)]
async fn test_polling_stops_without_observers() {
    let client = QueryClient::new(QueryConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let key = keys::sessions::detail(&SessionId::new("s1"));
    let options = QueryOptions::stale(stale_times::ATTENDANCE_STATUS)
        .with_refetch_interval(stale_times::ATTENDANCE_STATUS_POLL);

    let mut observer: QueryObserver<usize> = client.observe(&key, options, counting(calls.clone()));
    observer.settled().await.unwrap();
    drop(observer);
    assert!(!client.has_observers(&key));

    for _ in 0..3 {
        tokio::time::advance(stale_times::ATTENDANCE_STATUS_POLL).await;
        tokio::task::yield_now().await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unobserved_invalidation_refetches_lazily() {
    let client = QueryClient::new(QueryConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let key = keys::attendance::recent();
    let options = QueryOptions::stale(stale_times::RECENT_ATTENDANCE);

    let first: usize = client.fetch(&key, options, counting(calls.clone())).await.unwrap();
    assert_eq!(client.invalidate(&keys::attendance::all()), 1);
    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second: usize = client.fetch(&key, options, counting(calls.clone())).await.unwrap();
    assert_eq!((first, second), (1, 2));
}
