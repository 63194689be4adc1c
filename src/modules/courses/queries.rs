//! Cached course reads and invalidating course mutations.

use rollcall_cache::{Fetcher, Mutation, QueryObserver, QueryOptions, fetcher, keys, stale_times};
use rollcall_core::ClientError;
use rollcall_models::analytics::CourseAttendanceAnalytics;
use rollcall_models::{
    Course, CourseFilters, CourseId, CreateCourseRequest, EnrollmentRequest,
    FacultyAssignmentRequest, UpdateCourseRequest,
};
use validator::Validate;

use super::CourseService;
use crate::state::AppContext;

const OPTIONS: QueryOptions = QueryOptions::stale(stale_times::COURSES);
const ANALYTICS_OPTIONS: QueryOptions = QueryOptions::stale(stale_times::COURSE_ANALYTICS);

pub(crate) fn list_fetcher(ctx: &AppContext, filters: CourseFilters) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        let filters = filters.clone();
        async move { CourseService::list_courses(&api, &filters).await }
    })
}

pub async fn list(ctx: &AppContext, filters: CourseFilters) -> Result<Vec<Course>, ClientError> {
    let key = keys::courses::list(&filters);
    ctx.cache.fetch(&key, OPTIONS, list_fetcher(ctx, filters)).await
}

pub fn observe_list(ctx: &AppContext, filters: CourseFilters) -> QueryObserver<Vec<Course>> {
    let key = keys::courses::list(&filters);
    ctx.cache.observe(&key, OPTIONS, list_fetcher(ctx, filters))
}

/// `Ok(None)` without a request when `id` is empty.
pub async fn get(ctx: &AppContext, id: &CourseId) -> Result<Option<Course>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let course = id.clone();
    let detail = fetcher(move || {
        let api = api.clone();
        let id = course.clone();
        async move { CourseService::get_course(&api, &id).await }
    });
    ctx.cache
        .fetch(&keys::courses::detail(id), OPTIONS, detail)
        .await
        .map(Some)
}

pub async fn analytics(
    ctx: &AppContext,
    id: &CourseId,
) -> Result<Option<CourseAttendanceAnalytics>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let course = id.clone();
    let analytics = fetcher(move || {
        let api = api.clone();
        let id = course.clone();
        async move { CourseService::course_analytics(&api, &id).await }
    });
    ctx.cache
        .fetch(&keys::courses::analytics(id), ANALYTICS_OPTIONS, analytics)
        .await
        .map(Some)
}

pub async fn create(ctx: &AppContext, request: CreateCourseRequest) -> Result<Course, ClientError> {
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::CreateCourse,
            CourseService::create_course(&ctx.api, &request),
        )
        .await
}

pub async fn update(
    ctx: &AppContext,
    id: &CourseId,
    request: UpdateCourseRequest,
) -> Result<Course, ClientError> {
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::UpdateCourse(id.clone()),
            CourseService::update_course(&ctx.api, id, &request),
        )
        .await
}

pub async fn delete(ctx: &AppContext, id: &CourseId) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::DeleteCourse(id.clone()),
            CourseService::delete_course(&ctx.api, id),
        )
        .await
}

pub async fn enroll_student(ctx: &AppContext, request: EnrollmentRequest) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::EnrollStudent,
            CourseService::enroll_student(&ctx.api, &request),
        )
        .await
}

pub async fn assign_faculty(
    ctx: &AppContext,
    request: FacultyAssignmentRequest,
) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::AssignFaculty,
            CourseService::assign_faculty(&ctx.api, &request),
        )
        .await
}
