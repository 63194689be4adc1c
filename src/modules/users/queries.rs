//! Cached user lists and invalidating user mutations.
//!
//! Every user mutation invalidates all user keys, so the plain list and the
//! students and faculty lists refetch together.

use rollcall_cache::{Fetcher, Mutation, QueryObserver, QueryOptions, fetcher, keys, stale_times};
use rollcall_core::ClientError;
use rollcall_models::{RegisterRequest, UpdateUserRequest, User, UserFilters, UserId};
use validator::Validate;

use super::UserService;
use crate::state::AppContext;

const OPTIONS: QueryOptions = QueryOptions::stale(stale_times::USERS);

pub(crate) fn list_fetcher(ctx: &AppContext, filters: UserFilters) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        let filters = filters.clone();
        async move { UserService::list_users(&api, &filters).await }
    })
}

pub async fn list(ctx: &AppContext, filters: UserFilters) -> Result<Vec<User>, ClientError> {
    let key = keys::users::list(&filters);
    ctx.cache.fetch(&key, OPTIONS, list_fetcher(ctx, filters)).await
}

pub fn observe_list(ctx: &AppContext, filters: UserFilters) -> QueryObserver<Vec<User>> {
    let key = keys::users::list(&filters);
    ctx.cache.observe(&key, OPTIONS, list_fetcher(ctx, filters))
}

pub async fn students(ctx: &AppContext) -> Result<Vec<User>, ClientError> {
    let api = ctx.api.clone();
    let students = fetcher(move || {
        let api = api.clone();
        async move { UserService::list_students(&api).await }
    });
    ctx.cache.fetch(&keys::users::students(), OPTIONS, students).await
}

pub async fn faculty(ctx: &AppContext) -> Result<Vec<User>, ClientError> {
    let api = ctx.api.clone();
    let faculty = fetcher(move || {
        let api = api.clone();
        async move { UserService::list_faculty(&api).await }
    });
    ctx.cache.fetch(&keys::users::faculty(), OPTIONS, faculty).await
}

pub async fn create(ctx: &AppContext, request: RegisterRequest) -> Result<User, ClientError> {
    request.validate()?;
    ctx.cache
        .mutate(Mutation::CreateUser, UserService::create_user(&ctx.api, &request))
        .await
}

pub async fn update(
    ctx: &AppContext,
    id: &UserId,
    request: UpdateUserRequest,
) -> Result<User, ClientError> {
    request.validate()?;
    ctx.cache
        .mutate(
            Mutation::UpdateUser(id.clone()),
            UserService::update_user(&ctx.api, id, &request),
        )
        .await
}

pub async fn delete(ctx: &AppContext, id: &UserId) -> Result<(), ClientError> {
    ctx.cache
        .mutate(
            Mutation::DeleteUser(id.clone()),
            UserService::delete_user(&ctx.api, id),
        )
        .await
}
