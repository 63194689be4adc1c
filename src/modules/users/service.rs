use rollcall_core::{ClientError, decode, pluck, unwrap_envelope};
use rollcall_models::{RegisterRequest, UpdateUserRequest, User, UserFilters, UserId};
use tracing::instrument;

use crate::client::{ApiClient, endpoints};

pub struct UserService;

impl UserService {
    #[instrument(skip(api))]
    pub async fn list_users(api: &ApiClient, filters: &UserFilters) -> Result<Vec<User>, ClientError> {
        decode(api.get_with_query(endpoints::users::LIST, filters).await?)
    }

    #[instrument(skip(api))]
    pub async fn list_students(api: &ApiClient) -> Result<Vec<User>, ClientError> {
        decode(api.get(endpoints::users::STUDENTS).await?)
    }

    #[instrument(skip(api))]
    pub async fn list_faculty(api: &ApiClient) -> Result<Vec<User>, ClientError> {
        decode(api.get(endpoints::users::FACULTY).await?)
    }

    /// Accounts are created through the registration endpoint, which
    /// answers with the new user nested under `user`.
    #[instrument(skip(api, request), fields(email = %request.email, role = %request.role))]
    pub async fn create_user(api: &ApiClient, request: &RegisterRequest) -> Result<User, ClientError> {
        let body = unwrap_envelope(api.post(endpoints::auth::REGISTER, request).await?);
        decode(pluck(body, "user"))
    }

    #[instrument(skip(api, request))]
    pub async fn update_user(
        api: &ApiClient,
        id: &UserId,
        request: &UpdateUserRequest,
    ) -> Result<User, ClientError> {
        decode(api.put(endpoints::users::item(id), request).await?)
    }

    #[instrument(skip(api))]
    pub async fn delete_user(api: &ApiClient, id: &UserId) -> Result<(), ClientError> {
        api.delete(endpoints::users::item(id)).await?;
        Ok(())
    }
}
