use axum::extract::{rejection::QueryRejection, Query, State};

use super::utils::query_params;
use crate::middleware::{ApiResponse, ApiResult};
use crate::org::{build, EmployeeRecord, HierarchyView};
use crate::services::EmployeeQuery;
use crate::AppState;

/// GET /api/v1/org/tree - hierarchy of the filtered slice.
///
/// Accepts the same `dept`, `unit`, `manager` and `search` filters as the
/// directory. Spans and department counts describe the slice, not the whole
/// organization.
pub async fn tree(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> ApiResult<HierarchyView> {
    let query = query_params(query)?;
    let employees = state.store.select_employees(&query).await?;
    let records: Vec<EmployeeRecord> = employees.iter().map(EmployeeRecord::from).collect();

    let view = build(&records);
    tracing::debug!(
        "Org tree: {} nodes, {} managers, {} departments",
        view.nodes.len(),
        view.children.len(),
        view.dept_counts.len()
    );
    Ok(ApiResponse::success(view))
}
