//! Cached class-session reads and invalidating session mutations.

use rollcall_cache::{Fetcher, Mutation, QueryObserver, QueryOptions, fetcher, keys, stale_times};
use rollcall_core::ClientError;
use rollcall_models::{
    ClassSession, Coordinates, CreateSessionRequest, GeneratedQr, SessionAttendanceStatus,
    SessionFilters, SessionId, UpdateSessionRequest,
};
use validator::Validate;

use super::SessionService;
use crate::state::AppContext;

const OPTIONS: QueryOptions = QueryOptions::stale(stale_times::SESSIONS);
const STATUS_OPTIONS: QueryOptions = QueryOptions::stale(stale_times::ATTENDANCE_STATUS)
    .with_refetch_interval(stale_times::ATTENDANCE_STATUS_POLL);

pub(crate) fn list_fetcher(ctx: &AppContext, filters: SessionFilters) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        let filters = filters.clone();
        async move { SessionService::list_sessions(&api, &filters).await }
    })
}

fn status_fetcher(ctx: &AppContext, id: SessionId) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        let id = id.clone();
        async move { SessionService::attendance_status(&api, &id).await }
    })
}

pub async fn list(
    ctx: &AppContext,
    filters: SessionFilters,
) -> Result<Vec<ClassSession>, ClientError> {
    let key = keys::sessions::list(&filters);
    ctx.cache.fetch(&key, OPTIONS, list_fetcher(ctx, filters)).await
}

pub fn observe_list(ctx: &AppContext, filters: SessionFilters) -> QueryObserver<Vec<ClassSession>> {
    let key = keys::sessions::list(&filters);
    ctx.cache.observe(&key, OPTIONS, list_fetcher(ctx, filters))
}

/// `Ok(None)` without a request when `id` is empty.
pub async fn get(ctx: &AppContext, id: &SessionId) -> Result<Option<ClassSession>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let session = id.clone();
    let detail = fetcher(move || {
        let api = api.clone();
        let id = session.clone();
        async move { SessionService::get_session(&api, &id).await }
    });
    ctx.cache
        .fetch(&keys::sessions::detail(id), OPTIONS, detail)
        .await
        .map(Some)
}

pub async fn attendance_status(
    ctx: &AppContext,
    id: &SessionId,
) -> Result<Option<SessionAttendanceStatus>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    ctx.cache
        .fetch(
            &keys::sessions::attendance(id),
            STATUS_OPTIONS,
            status_fetcher(ctx, id.clone()),
        )
        .await
        .map(Some)
}

/// Watches the caller's attendance in a session, polling every 30 seconds
/// while observed. `None` without registering a query when `id` is empty.
pub fn observe_attendance_status(
    ctx: &AppContext,
    id: &SessionId,
) -> Option<QueryObserver<SessionAttendanceStatus>> {
    if id.is_empty() {
        return None;
    }
    Some(ctx.cache.observe(
        &keys::sessions::attendance(id),
        STATUS_OPTIONS,
        status_fetcher(ctx, id.clone()),
    ))
}

pub async fn create(
    ctx: &AppContext,
    request: CreateSessionRequest,
) -> Result<ClassSession, ClientError> {
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::CreateSession,
            SessionService::create_session(&ctx.api, &request),
        )
        .await
}

pub async fn update(
    ctx: &AppContext,
    id: &SessionId,
    request: UpdateSessionRequest,
) -> Result<ClassSession, ClientError> {
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::UpdateSession(id.clone()),
            SessionService::update_session(&ctx.api, id, &request),
        )
        .await
}

pub async fn delete(ctx: &AppContext, id: &SessionId) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::DeleteSession(id.clone()),
            SessionService::delete_session(&ctx.api, id),
        )
        .await
}

pub async fn generate_qr(
    ctx: &AppContext,
    id: &SessionId,
    location: Option<Coordinates>,
) -> Result<GeneratedQr, ClientError> {
    ctx.cache
        .mutate(
            Mutation::GenerateQr(id.clone()),
            SessionService::generate_qr(&ctx.api, id, location),
        )
        .await
}

pub async fn join(ctx: &AppContext, id: &SessionId) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::JoinSession(id.clone()),
            SessionService::join_session(&ctx.api, id),
        )
        .await
}

pub async fn leave(ctx: &AppContext, id: &SessionId) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::LeaveSession(id.clone()),
            SessionService::leave_session(&ctx.api, id),
        )
        .await
}
