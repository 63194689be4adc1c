//! Cached department reads and invalidating department mutations.

use rollcall_cache::{Fetcher, Mutation, QueryObserver, QueryOptions, fetcher, keys, stale_times};
use rollcall_core::ClientError;
use rollcall_models::analytics::DepartmentAnalytics;
use rollcall_models::{
    CreateDepartmentRequest, Department, DepartmentFilters, DepartmentId, UpdateDepartmentRequest,
};
use validator::Validate;

use super::DepartmentService;
use crate::state::AppContext;

const LIST_OPTIONS: QueryOptions = QueryOptions::stale(stale_times::DEPARTMENT_LIST);
const DETAIL_OPTIONS: QueryOptions = QueryOptions::stale(stale_times::DEPARTMENT_DETAIL);
const ANALYTICS_OPTIONS: QueryOptions = QueryOptions::stale(stale_times::DEPARTMENT_ANALYTICS);

fn list_fetcher(ctx: &AppContext, filters: DepartmentFilters) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        let filters = filters.clone();
        async move { DepartmentService::list_departments(&api, &filters).await }
    })
}

fn detail_fetcher(ctx: &AppContext, id: DepartmentId) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        let id = id.clone();
        async move { DepartmentService::get_department(&api, &id).await }
    })
}

pub async fn list(
    ctx: &AppContext,
    filters: DepartmentFilters,
) -> Result<Vec<Department>, ClientError> {
    let key = keys::departments::list(&filters);
    ctx.cache
        .fetch(&key, LIST_OPTIONS, list_fetcher(ctx, filters))
        .await
}

pub fn observe_list(ctx: &AppContext, filters: DepartmentFilters) -> QueryObserver<Vec<Department>> {
    let key = keys::departments::list(&filters);
    ctx.cache
        .observe(&key, LIST_OPTIONS, list_fetcher(ctx, filters))
}

/// `Ok(None)` without a request when `id` is empty.
pub async fn get(ctx: &AppContext, id: &DepartmentId) -> Result<Option<Department>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    ctx.cache
        .fetch(
            &keys::departments::detail(id),
            DETAIL_OPTIONS,
            detail_fetcher(ctx, id.clone()),
        )
        .await
        .map(Some)
}

pub async fn analytics(
    ctx: &AppContext,
    id: &DepartmentId,
) -> Result<Option<DepartmentAnalytics>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    let api = ctx.api.clone();
    let department = id.clone();
    let analytics_fetcher = fetcher(move || {
        let api = api.clone();
        let id = department.clone();
        async move { DepartmentService::department_analytics(&api, &id).await }
    });
    ctx.cache
        .fetch(
            &keys::departments::analytics(id),
            ANALYTICS_OPTIONS,
            analytics_fetcher,
        )
        .await
        .map(Some)
}

pub async fn create(
    ctx: &AppContext,
    request: CreateDepartmentRequest,
) -> Result<Department, ClientError> {
    let request = request.normalized();
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::CreateDepartment,
            DepartmentService::create_department(&ctx.api, &request),
        )
        .await
}

pub async fn update(
    ctx: &AppContext,
    id: &DepartmentId,
    request: UpdateDepartmentRequest,
) -> Result<Department, ClientError> {
    let request = request.normalized();
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::UpdateDepartment(id.clone()),
            DepartmentService::update_department(&ctx.api, id, &request),
        )
        .await
}

pub async fn delete(ctx: &AppContext, id: &DepartmentId) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::DeleteDepartment(id.clone()),
            DepartmentService::delete_department(&ctx.api, id),
        )
        .await
}
