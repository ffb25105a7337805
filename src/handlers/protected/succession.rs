use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};

use super::utils::{query_params, PageParams};
use crate::database::models::Succession;
use crate::database::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{SuccessionQuery, SuccessionToggle};
use crate::AppState;

/// Roles allowed to change succession flags
pub const SUCCESSION_EDITORS: &[&str] = &["hr", "admin", "supervisor"];

/// GET /api/v1/succession - newest first
pub async fn list(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    query: Result<Query<SuccessionQuery>, QueryRejection>,
) -> ApiResult<Page<Succession>> {
    let page = query_params(page)?.resolve(&state.config.pagination)?;
    let query = query_params(query)?;
    Ok(ApiResponse::success(state.store.list_succession(&query, page).await?))
}

/// POST /api/v1/succession/toggle - star or unstar a candidate for a role
pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<SuccessionToggle>, JsonRejection>,
) -> ApiResult<Succession> {
    user.require_role(SUCCESSION_EDITORS)?;
    let Json(input) = payload.map_err(|e| ApiError::validation_error(e.body_text(), None))?;

    let entry = state.store.toggle_succession(input).await?;
    tracing::info!(
        "{} set succession {} -> {} starred={}",
        user.email,
        entry.employee_id,
        entry.target_role,
        entry.is_starred
    );
    Ok(ApiResponse::success(entry))
}
