use rollcall_core::{ClientError, decode};
use rollcall_models::analytics::DepartmentAnalytics;
use rollcall_models::{
    CreateDepartmentRequest, Department, DepartmentFilters, DepartmentId, UpdateDepartmentRequest,
};
use tracing::instrument;

use crate::client::{ApiClient, endpoints};

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(api))]
    pub async fn list_departments(
        api: &ApiClient,
        filters: &DepartmentFilters,
    ) -> Result<Vec<Department>, ClientError> {
        decode(
            api.get_with_query(endpoints::departments::LIST, filters)
                .await?,
        )
    }

    #[instrument(skip(api))]
    pub async fn get_department(
        api: &ApiClient,
        id: &DepartmentId,
    ) -> Result<Department, ClientError> {
        decode(api.get(endpoints::departments::item(id)).await?)
    }

    #[instrument(skip(api, request), fields(code = %request.code))]
    pub async fn create_department(
        api: &ApiClient,
        request: &CreateDepartmentRequest,
    ) -> Result<Department, ClientError> {
        decode(api.post(endpoints::departments::LIST, request).await?)
    }

    #[instrument(skip(api, request))]
    pub async fn update_department(
        api: &ApiClient,
        id: &DepartmentId,
        request: &UpdateDepartmentRequest,
    ) -> Result<Department, ClientError> {
        decode(api.put(endpoints::departments::item(id), request).await?)
    }

    #[instrument(skip(api))]
    pub async fn delete_department(api: &ApiClient, id: &DepartmentId) -> Result<(), ClientError> {
        api.delete(endpoints::departments::item(id)).await?;
        Ok(())
    }

    #[instrument(skip(api))]
    pub async fn department_analytics(
        api: &ApiClient,
        id: &DepartmentId,
    ) -> Result<DepartmentAnalytics, ClientError> {
        decode(api.get(endpoints::departments::analytics(id)).await?)
    }
}
