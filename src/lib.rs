pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod org;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::services::HrStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HrStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn HrStore>, config: AppConfig) -> Self {
        Self { store, config: Arc::new(config) }
    }
}

/// Full HTTP application: public probes, `/api/v1` routes and global layers
pub fn app(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()));

    Router::new()
        // Public
        .route("/", get(handlers::public::health::root))
        .route("/health", get(handlers::public::health::health))
        .route("/healthz", get(handlers::public::health::health))
        .route("/dbz", get(handlers::public::health::dbz))
        .nest(&state.config.api.v1_prefix, v1)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), middleware::slow_request_log))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{employees, me, org, roles, succession, vacancies};

    Router::new()
        .route("/auth/me", get(me::me))
        .route("/employees", get(employees::list))
        .route("/employees/:id", get(employees::get))
        .route("/roles", get(roles::list))
        .route("/roles/:id", get(roles::get))
        .route("/vacancies", get(vacancies::list))
        .route("/succession", get(succession::list))
        .route("/succession/toggle", post(succession::toggle))
        .route("/org/tree", get(org::tree))
        // route_layer keeps unknown paths at 404 instead of 401
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
