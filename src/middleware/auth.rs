use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::{self, TokenType, ADMIN_ROLE};
use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller, resolved from the access token subject
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

impl AuthUser {
    /// Forbidden unless the caller holds one of `roles`
    pub fn require_role(&self, roles: &[&str]) -> Result<(), ApiError> {
        if roles.iter().any(|role| *role == self.role) {
            Ok(())
        } else {
            tracing::warn!("{} ({}) lacks one of {:?}", self.email, self.role, roles);
            Err(ApiError::forbidden("Insufficient role"))
        }
    }
}

/// Validates the bearer access token and injects `AuthUser` into the request
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = auth::decode_token(&token, TokenType::Access, &state.config.security)?;
    let user = resolve_user(&state, &claims.sub).await?;

    if !user.is_active {
        tracing::warn!("Inactive user {} rejected", user.email);
        return Err(ApiError::forbidden("User is inactive"));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// The env admin resolves without a store lookup
async fn resolve_user(state: &AppState, email: &str) -> Result<AuthUser, ApiError> {
    if auth::is_admin_email(email, &state.config.security) {
        return Ok(AuthUser {
            email: auth::normalize_email(email),
            role: ADMIN_ROLE.to_string(),
            is_active: true,
        });
    }

    match state.store.find_user_by_email(email).await? {
        Some(user) => Ok(AuthUser { email: user.email, role: user.role, is_active: user.is_active }),
        None => {
            tracing::warn!("Token subject {} has no user", email);
            Err(ApiError::unauthorized("User not found"))
        }
    }
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
