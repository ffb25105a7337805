use axum::Extension;

use crate::middleware::{ApiResponse, AuthUser};

/// GET /api/v1/auth/me - the caller as resolved by the auth middleware
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResponse<AuthUser> {
    ApiResponse::success(user)
}
