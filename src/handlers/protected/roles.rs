use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};

use super::utils::{path_uuid, query_params, PageParams};
use crate::database::models::Role;
use crate::database::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RoleQuery;
use crate::AppState;

/// GET /api/v1/roles - role catalog, name ascending then newest version first
pub async fn list(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    query: Result<Query<RoleQuery>, QueryRejection>,
) -> ApiResult<Page<Role>> {
    let page = query_params(page)?.resolve(&state.config.pagination)?;
    let query = query_params(query)?;
    Ok(ApiResponse::success(state.store.list_roles(&query, page).await?))
}

/// GET /api/v1/roles/:id
pub async fn get(State(state): State<AppState>, id: Result<Path<uuid::Uuid>, PathRejection>) -> ApiResult<Role> {
    let id = path_uuid(id)?;
    state
        .store
        .get_role(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Role not found"))
}
