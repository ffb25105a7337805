use axum::extract::{rejection::QueryRejection, Query, State};

use super::utils::{query_params, PageParams};
use crate::database::models::Vacancy;
use crate::database::Page;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::VacancyQuery;
use crate::AppState;

/// GET /api/v1/vacancies - newest first
pub async fn list(
    State(state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    query: Result<Query<VacancyQuery>, QueryRejection>,
) -> ApiResult<Page<Vacancy>> {
    let page = query_params(page)?.resolve(&state.config.pagination)?;
    let query = query_params(query)?;
    Ok(ApiResponse::success(state.store.list_vacancies(&query, page).await?))
}
