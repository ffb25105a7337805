use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::{self, AuthError, TokenPair, TokenType};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: Option<String>,
}

/// POST /api/v1/auth/login - exchange credentials for a token pair.
///
/// Unknown email and wrong password give the same 401 so callers cannot probe
/// which accounts exist.
pub async fn login(State(state): State<AppState>, payload: Result<Json<LoginRequest>, JsonRejection>) -> ApiResult<TokenPair> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let security = &state.config.security;
    let email = auth::normalize_email(&payload.email);

    if auth::admin_login_matches(&email, &payload.password, security) {
        tracing::info!("Admin login for {}", email);
        return Ok(ApiResponse::success(auth::issue_pair(&email, security)?));
    }

    let user = state.store.find_user_by_email(&email).await?;
    match user {
        Some(user) if auth::verify_password(&payload.password, &user.password_hash) => {
            tracing::info!("Login for {}", email);
            Ok(ApiResponse::success(auth::issue_pair(&user.email, security)?))
        }
        _ => {
            tracing::warn!("Failed login for {}", email);
            Err(ApiError::unauthorized("Invalid credentials"))
        }
    }
}

/// POST /api/v1/auth/refresh?refresh_token=... - rotate a token pair
pub async fn refresh(State(state): State<AppState>, Query(params): Query<RefreshParams>) -> ApiResult<TokenPair> {
    let security = &state.config.security;
    let token = params
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    let claims = auth::decode_token(token.trim(), TokenType::Refresh, security).map_err(|e| match e {
        AuthError::SecretNotConfigured => ApiError::from(e),
        other => {
            tracing::warn!("Refresh rejected: {}", other);
            ApiError::unauthorized("Invalid or expired refresh token")
        }
    })?;

    Ok(ApiResponse::success(auth::issue_pair(&claims.sub, security)?))
}
