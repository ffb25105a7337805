use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::AppState;

/// Longest `/dbz` error text returned to the client
const DBZ_ERROR_MAX_CHARS: usize = 200;

/// GET / - service info
pub async fn root(State(state): State<AppState>) -> ApiResponse<Value> {
    let prefix = &state.config.api.v1_prefix;
    ApiResponse::success(json!({
        "name": state.config.api.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "env": state.config.environment.as_str(),
        "backend": state.store.backend(),
        "endpoints": {
            "health": "/health, /healthz (public)",
            "db": "/dbz (public)",
            "auth": format!("{prefix}/auth/login, {prefix}/auth/refresh (public), {prefix}/auth/me (protected)"),
            "employees": format!("{prefix}/employees[/:id] (protected)"),
            "roles": format!("{prefix}/roles[/:id] (protected)"),
            "vacancies": format!("{prefix}/vacancies (protected)"),
            "succession": format!("{prefix}/succession, {prefix}/succession/toggle (protected)"),
            "org": format!("{prefix}/org/tree (protected)"),
        }
    }))
}

/// GET /health and GET /healthz - liveness, never touches storage
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "env": state.config.environment.as_str() }))
}

/// GET /dbz - storage readiness
pub async fn dbz(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "db": "ok" }))),
        Err(e) => {
            tracing::error!("Readiness check failed on {}: {}", state.store.backend(), e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "db": "down", "error": truncate_chars(&e.to_string(), DBZ_ERROR_MAX_CHARS) })),
            )
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
