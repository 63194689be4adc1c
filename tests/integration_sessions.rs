mod common;

use std::time::Duration;

use common::{MockBackend, PASSWORD};
use rollcall::modules::sessions;
use rollcall::rollcall_cache::keys;
use rollcall::rollcall_models::{LoginRequest, SessionId};
use rollcall::state::AppContext;
use tokio::time::{sleep, timeout};

async fn signed_in_student(backend: &MockBackend) -> AppContext {
    let (ctx, _storage, _notifier) = backend.context().await;
    ctx.login(LoginRequest::new("student@uni.edu", PASSWORD))
        .await
        .unwrap();
    ctx
}

#[tokio::test]
async fn test_empty_id_disables_attendance_status_observer() {
    let backend = MockBackend::start().await;
    let (ctx, _storage, notifier) = backend.context().await;
    ctx.login(LoginRequest::new("student@uni.edu", PASSWORD))
        .await
        .unwrap();

    let observer = sessions::queries::observe_attendance_status(&ctx, &SessionId::new(""));
    sleep(Duration::from_millis(300)).await;

    assert!(observer.is_none());
    assert!(ctx.cache.is_empty());
    assert!(notifier.errors().is_empty());
    assert_eq!(backend.hits("GET /sessions//attendance-status"), 0);
}

#[tokio::test]
async fn test_attendance_status_observer_fetches_session() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;
    let id = SessionId::new("s-1");

    let mut observer = sessions::queries::observe_attendance_status(&ctx, &id).unwrap();
    let status = timeout(Duration::from_secs(5), observer.settled())
        .await
        .expect("attendance status never settled")
        .unwrap();

    assert!(!status.is_present);
    assert!(ctx.cache.has_observers(&keys::sessions::attendance(&id)));
    assert_eq!(backend.hits("GET /sessions/s-1/attendance-status"), 1);
}
