use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::AppState;

/// Logs a warning for any request slower than `api.slow_request_ms`
pub async fn slow_request_log(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    if elapsed_ms > state.config.api.slow_request_ms {
        tracing::warn!(
            "[ACCESS] {} {} -> {} ms (status {})",
            method,
            path,
            elapsed_ms,
            response.status().as_u16()
        );
    }
    response
}
