//! Attendance reads and the two marking mutations.
//!
//! Marking attendance invalidates every attendance key and every session
//! key, since session counts and statuses change with it.

use rollcall_cache::{Mutation, QueryOptions, fetcher, keys, stale_times};
use rollcall_core::ClientError;
use rollcall_models::analytics::StudentAnalytics;
use rollcall_models::{
    AttendanceRecord, Coordinates, CourseId, MarkOnlineRequest, MarkQrRequest, SessionId, UserId,
};
use rollcall_observability::track_attendance_marked;

use super::AttendanceService;
use crate::state::AppContext;

fn outcome<T>(result: &Result<T, ClientError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(err) if err.is_domain() => "rejected",
        Err(_) => "error",
    }
}

pub async fn mark_qr(
    ctx: &AppContext,
    qr_code_id: impl Into<String>,
    location: Option<Coordinates>,
) -> Result<AttendanceRecord, ClientError> {
    let request = MarkQrRequest {
        qr_code_id: qr_code_id.into(),
        location,
    };
    let result = ctx
        .cache
        .mutate(
            Mutation::MarkAttendanceQr,
            AttendanceService::mark_qr(&ctx.api, &request),
        )
        .await;
    track_attendance_marked("qr", outcome(&result));
    result
}

pub async fn mark_online(
    ctx: &AppContext,
    session_id: &SessionId,
    duration: Option<u32>,
) -> Result<AttendanceRecord, ClientError> {
    let request = MarkOnlineRequest {
        session_id: session_id.clone(),
        duration,
    };
    let result = ctx
        .cache
        .mutate(
            Mutation::MarkAttendanceOnline,
            AttendanceService::mark_online(&ctx.api, &request),
        )
        .await;
    track_attendance_marked("online", outcome(&result));
    result
}

/// A student's records, optionally narrowed to one course. `Ok(None)`
/// without a request when `student_id` is empty.
pub async fn student(
    ctx: &AppContext,
    student_id: &UserId,
    course_id: Option<&CourseId>,
) -> Result<Option<Vec<AttendanceRecord>>, ClientError> {
    if student_id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let student = student_id.clone();
    let course = course_id.cloned();
    let records = fetcher(move || {
        let api = api.clone();
        let student = student.clone();
        let course = course.clone();
        async move { AttendanceService::student_attendance(&api, &student, course.as_ref()).await }
    });
    ctx.cache
        .fetch(
            &keys::attendance::student(student_id, course_id),
            QueryOptions::stale(stale_times::STUDENT_ATTENDANCE),
            records,
        )
        .await
        .map(Some)
}

pub async fn session(
    ctx: &AppContext,
    session_id: &SessionId,
) -> Result<Option<Vec<AttendanceRecord>>, ClientError> {
    if session_id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let id = session_id.clone();
    let records = fetcher(move || {
        let api = api.clone();
        let id = id.clone();
        async move { AttendanceService::session_attendance(&api, &id).await }
    });
    ctx.cache
        .fetch(
            &keys::attendance::session(session_id),
            QueryOptions::stale(stale_times::SESSION_ATTENDANCE),
            records,
        )
        .await
        .map(Some)
}

pub async fn analytics(
    ctx: &AppContext,
    student_id: &UserId,
) -> Result<Option<StudentAnalytics>, ClientError> {
    if student_id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let id = student_id.clone();
    let analytics = fetcher(move || {
        let api = api.clone();
        let id = id.clone();
        async move { AttendanceService::student_analytics(&api, &id).await }
    });
    ctx.cache
        .fetch(
            &keys::attendance::analytics(student_id),
            QueryOptions::stale(stale_times::STUDENT_ANALYTICS),
            analytics,
        )
        .await
        .map(Some)
}

pub async fn recent(ctx: &AppContext) -> Result<Vec<AttendanceRecord>, ClientError> {
    let api = ctx.api.clone();
    let records = fetcher(move || {
        let api = api.clone();
        async move { AttendanceService::recent_attendance(&api).await }
    });
    ctx.cache
        .fetch(
            &keys::attendance::recent(),
            QueryOptions::stale(stale_times::RECENT_ATTENDANCE),
            records,
        )
        .await
}
