mod common;

use std::sync::Arc;

use common::{MockBackend, PASSWORD};
use rollcall::rollcall_models::{LoginRequest, SessionId};
use rollcall::scanner::{FixedLocation, LOCATION_REQUIRED_MESSAGE, ScanFlow, ScanState};
use rollcall::state::AppContext;

async fn signed_in_student(backend: &MockBackend) -> AppContext {
    let (ctx, _storage, _notifier) = backend.context().await;
    ctx.login(LoginRequest::new("student@uni.edu", PASSWORD))
        .await
        .unwrap();
    ctx
}

fn scanner(ctx: &AppContext, location: FixedLocation) -> ScanFlow {
    let flow = ScanFlow::new(ctx.clone(), Arc::new(location));
    flow.start();
    flow
}

#[tokio::test]
async fn test_used_qr_code_fails_with_server_message() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;
    backend.mark_qr_used("qr-token-123");

    let flow = scanner(&ctx, FixedLocation::at(12.9, 77.6));
    let mut states = flow.subscribe();

    let state = flow.decoded("qr-token-123").await;

    assert_eq!(
        state,
        ScanState::Failed {
            message: "QR code already used".to_string()
        }
    );
    assert_eq!(*states.borrow_and_update(), state);
    assert_eq!(backend.hits("POST /attendance/mark-qr"), 1);
}

#[tokio::test]
async fn test_fresh_qr_code_marks_attendance() {
    let backend = MockBackend::start().await;
    let (ctx, _storage, notifier) = backend.context().await;
    ctx.login(LoginRequest::new("student@uni.edu", PASSWORD))
        .await
        .unwrap();

    let flow = scanner(&ctx, FixedLocation::at(12.9, 77.6));
    let state = flow
        .decoded(r#"{"qrCodeId":"qr-token-456","sessionId":"s-1"}"#)
        .await;

    assert_eq!(
        state,
        ScanState::Success {
            session_id: SessionId::new("s-1")
        }
    );
    assert!(
        notifier
            .all()
            .iter()
            .any(|n| n.message == "Attendance marked successfully!")
    );
}

#[tokio::test]
async fn test_missing_location_fails_before_submitting() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;

    let flow = scanner(&ctx, FixedLocation::unavailable());
    let state = flow.decoded("qr-token-789").await;

    assert_eq!(
        state,
        ScanState::Failed {
            message: LOCATION_REQUIRED_MESSAGE.to_string()
        }
    );
    assert_eq!(backend.hits("POST /attendance/mark-qr"), 0);
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;

    let flow = scanner(&ctx, FixedLocation::at(12.9, 77.6));
    let state = flow.decoded("{\"qrCodeId\": ").await;

    assert_eq!(
        state,
        ScanState::Failed {
            message: "Invalid QR code format".to_string()
        }
    );
    assert_eq!(backend.hits("POST /attendance/mark-qr"), 0);
}

#[tokio::test]
async fn test_repeated_payload_is_processed_once() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;
    backend.mark_qr_used("qr-token-123");

    let flow = scanner(&ctx, FixedLocation::at(12.9, 77.6));
    let first = flow.decoded("qr-token-123").await;
    let second = flow.decoded("qr-token-123").await;

    assert_eq!(first, second);
    assert_eq!(backend.hits("POST /attendance/mark-qr"), 1);
}

#[tokio::test]
async fn test_idle_scanner_ignores_frames() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;

    let flow = ScanFlow::new(ctx.clone(), Arc::new(FixedLocation::at(12.9, 77.6)));
    flow.decode_failed("no code in frame");

    assert_eq!(flow.decoded("qr-token-123").await, ScanState::Idle);
    assert_eq!(backend.hits("POST /attendance/mark-qr"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payloads_submit_once() {
    let backend = MockBackend::start().await;
    let ctx = signed_in_student(&backend).await;
    let flow = Arc::new(scanner(&ctx, FixedLocation::at(12.9, 77.6)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.decoded(&format!("qr-token-{}", i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(matches!(flow.state(), ScanState::Success { .. }));
    assert_eq!(backend.hits("POST /attendance/mark-qr"), 1);
}
