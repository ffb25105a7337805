use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};

use super::utils::{path_uuid, query_params, PageParams};
use crate::database::models::Employee;
use crate::database::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EmployeeQuery;
use crate::AppState;

/// GET /api/v1/employees - paginated directory, ordered by name
pub async fn list(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> ApiResult<Page<Employee>> {
    let page = query_params(page)?.resolve(&state.config.pagination)?;
    let query = query_params(query)?;
    let employees = state.store.list_employees(&query, page).await?;
    Ok(ApiResponse::success(employees))
}

/// GET /api/v1/employees/:id
pub async fn get(State(state): State<AppState>, id: Result<Path<uuid::Uuid>, PathRejection>) -> ApiResult<Employee> {
    let id = path_uuid(id)?;
    state
        .store
        .get_employee(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Employee not found"))
}
