use rollcall_core::{ClientError, decode};
use rollcall_models::analytics::StudentAnalytics;
use rollcall_models::{
    AttendanceRecord, CourseId, MarkOnlineRequest, MarkQrRequest, SessionId, UserId,
};
use serde::Serialize;
use tracing::instrument;

use crate::client::{ApiClient, endpoints};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StudentAttendanceQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    course_id: Option<&'a CourseId>,
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(api, request))]
    pub async fn mark_qr(
        api: &ApiClient,
        request: &MarkQrRequest,
    ) -> Result<AttendanceRecord, ClientError> {
        decode(api.post(endpoints::attendance::MARK_QR, request).await?)
    }

    #[instrument(skip(api))]
    pub async fn mark_online(
        api: &ApiClient,
        request: &MarkOnlineRequest,
    ) -> Result<AttendanceRecord, ClientError> {
        decode(api.post(endpoints::attendance::MARK_ONLINE, request).await?)
    }

    #[instrument(skip(api))]
    pub async fn student_attendance(
        api: &ApiClient,
        student_id: &UserId,
        course_id: Option<&CourseId>,
    ) -> Result<Vec<AttendanceRecord>, ClientError> {
        let query = StudentAttendanceQuery { course_id };
        decode(
            api.get_with_query(endpoints::attendance::student(student_id), &query)
                .await?,
        )
    }

    #[instrument(skip(api))]
    pub async fn session_attendance(
        api: &ApiClient,
        session_id: &SessionId,
    ) -> Result<Vec<AttendanceRecord>, ClientError> {
        decode(api.get(endpoints::attendance::session(session_id)).await?)
    }

    #[instrument(skip(api))]
    pub async fn student_analytics(
        api: &ApiClient,
        student_id: &UserId,
    ) -> Result<StudentAnalytics, ClientError> {
        decode(api.get(endpoints::attendance::analytics(student_id)).await?)
    }

    #[instrument(skip(api))]
    pub async fn recent_attendance(api: &ApiClient) -> Result<Vec<AttendanceRecord>, ClientError> {
        decode(api.get(endpoints::attendance::RECENT).await?)
    }
}
