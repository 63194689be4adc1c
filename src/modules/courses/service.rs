use rollcall_core::{ClientError, decode};
use rollcall_models::analytics::CourseAttendanceAnalytics;
use rollcall_models::{
    Course, CourseFilters, CourseId, CreateCourseRequest, EnrollmentRequest,
    FacultyAssignmentRequest, UpdateCourseRequest,
};
use tracing::instrument;

use crate::client::{ApiClient, endpoints};

pub struct CourseService;

impl CourseService {
    #[instrument(skip(api))]
    pub async fn list_courses(
        api: &ApiClient,
        filters: &CourseFilters,
    ) -> Result<Vec<Course>, ClientError> {
        decode(api.get_with_query(endpoints::courses::LIST, filters).await?)
    }

    #[instrument(skip(api))]
    pub async fn get_course(api: &ApiClient, id: &CourseId) -> Result<Course, ClientError> {
        decode(api.get(endpoints::courses::item(id)).await?)
    }

    #[instrument(skip(api, request), fields(code = %request.code))]
    pub async fn create_course(
        api: &ApiClient,
        request: &CreateCourseRequest,
    ) -> Result<Course, ClientError> {
        decode(api.post(endpoints::courses::LIST, request).await?)
    }

    #[instrument(skip(api, request))]
    pub async fn update_course(
        api: &ApiClient,
        id: &CourseId,
        request: &UpdateCourseRequest,
    ) -> Result<Course, ClientError> {
        decode(api.put(endpoints::courses::item(id), request).await?)
    }

    #[instrument(skip(api))]
    pub async fn delete_course(api: &ApiClient, id: &CourseId) -> Result<(), ClientError> {
        api.delete(endpoints::courses::item(id)).await?;
        Ok(())
    }

    #[instrument(skip(api))]
    pub async fn enroll_student(
        api: &ApiClient,
        request: &EnrollmentRequest,
    ) -> Result<(), ClientError> {
        api.post(endpoints::courses::ENROLL, request).await?;
        Ok(())
    }

    #[instrument(skip(api))]
    pub async fn assign_faculty(
        api: &ApiClient,
        request: &FacultyAssignmentRequest,
    ) -> Result<(), ClientError> {
        api.post(endpoints::courses::ASSIGN_FACULTY, request).await?;
        Ok(())
    }

    #[instrument(skip(api))]
    pub async fn course_analytics(
        api: &ApiClient,
        id: &CourseId,
    ) -> Result<CourseAttendanceAnalytics, ClientError> {
        decode(api.get(endpoints::courses::analytics(id)).await?)
    }
}
