use rollcall_core::{ClientError, decode};
use rollcall_models::{
    ClassSession, Coordinates, CreateSessionRequest, GeneratedQr, SessionAttendanceStatus,
    SessionFilters, SessionId, UpdateSessionRequest,
};
use tracing::instrument;

use crate::client::{ApiClient, endpoints};

pub struct SessionService;

impl SessionService {
    #[instrument(skip(api))]
    pub async fn list_sessions(
        api: &ApiClient,
        filters: &SessionFilters,
    ) -> Result<Vec<ClassSession>, ClientError> {
        decode(api.get_with_query(endpoints::sessions::LIST, filters).await?)
    }

    #[instrument(skip(api))]
    pub async fn get_session(api: &ApiClient, id: &SessionId) -> Result<ClassSession, ClientError> {
        decode(api.get(endpoints::sessions::item(id)).await?)
    }

    #[instrument(skip(api, request), fields(title = %request.title))]
    pub async fn create_session(
        api: &ApiClient,
        request: &CreateSessionRequest,
    ) -> Result<ClassSession, ClientError> {
        decode(api.post(endpoints::sessions::LIST, request).await?)
    }

    #[instrument(skip(api, request))]
    pub async fn update_session(
        api: &ApiClient,
        id: &SessionId,
        request: &UpdateSessionRequest,
    ) -> Result<ClassSession, ClientError> {
        decode(api.put(endpoints::sessions::item(id), request).await?)
    }

    #[instrument(skip(api))]
    pub async fn delete_session(api: &ApiClient, id: &SessionId) -> Result<(), ClientError> {
        api.delete(endpoints::sessions::item(id)).await?;
        Ok(())
    }

    /// Issues a fresh QR code. The faculty member's location, when given,
    /// anchors the backend's proximity check.
    #[instrument(skip(api))]
    pub async fn generate_qr(
        api: &ApiClient,
        id: &SessionId,
        location: Option<Coordinates>,
    ) -> Result<GeneratedQr, ClientError> {
        let path = endpoints::sessions::generate_qr(id);
        let body = match location {
            Some(location) => api.post(path, &location).await?,
            None => api.post_empty(path).await?,
        };
        decode(body)
    }

    #[instrument(skip(api))]
    pub async fn join_session(api: &ApiClient, id: &SessionId) -> Result<(), ClientError> {
        api.post_empty(endpoints::sessions::join(id)).await?;
        Ok(())
    }

    #[instrument(skip(api))]
    pub async fn leave_session(api: &ApiClient, id: &SessionId) -> Result<(), ClientError> {
        api.post_empty(endpoints::sessions::leave(id)).await?;
        Ok(())
    }

    #[instrument(skip(api))]
    pub async fn attendance_status(
        api: &ApiClient,
        id: &SessionId,
    ) -> Result<SessionAttendanceStatus, ClientError> {
        decode(api.get(endpoints::sessions::attendance_status(id)).await?)
    }
}
