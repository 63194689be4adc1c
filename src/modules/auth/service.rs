use rollcall_core::{ClientError, decode};
use rollcall_models::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, User};
use tracing::instrument;

use crate::client::{ApiClient, endpoints};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(api, request), fields(email = %request.email))]
    pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        decode(api.post(endpoints::auth::LOGIN, request).await?)
    }

    #[instrument(skip(api, request), fields(email = %request.email, role = %request.role))]
    pub async fn register(
        api: &ApiClient,
        request: &RegisterRequest,
    ) -> Result<LoginResponse, ClientError> {
        decode(api.post(endpoints::auth::REGISTER, request).await?)
    }

    #[instrument(skip(api))]
    pub async fn get_profile(api: &ApiClient) -> Result<User, ClientError> {
        decode(api.get(endpoints::auth::PROFILE).await?)
    }

    #[instrument(skip(api, request))]
    pub async fn update_profile(
        api: &ApiClient,
        request: &UpdateProfileRequest,
    ) -> Result<User, ClientError> {
        decode(api.put(endpoints::auth::PROFILE, request).await?)
    }
}
