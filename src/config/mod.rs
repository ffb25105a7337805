use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Staging => "staging",
            Environment::Production => "prod",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<i32>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub statement_timeout_ms: u64,
    pub fixture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub app_name: String,
    pub v1_prefix: String,
    pub port: u16,
    pub slow_request_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            // anything unparseable disables the cap
            self.filter.max_limit = v.trim().parse().ok();
        }
        env_parse("FILTER_DEBUG_LOGGING", &mut self.filter.debug_logging);

        env_string("DATABASE_URL", &mut self.database.url);
        env_parse("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        env_parse("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);
        env_parse("DATABASE_STATEMENT_TIMEOUT_MS", &mut self.database.statement_timeout_ms);
        env_string("NOVA_FIXTURE", &mut self.database.fixture);

        if let Some(name) = env::var("APP_NAME").ok().and_then(non_empty) {
            self.api.app_name = name;
        }
        env_parse("PORT", &mut self.api.port);
        env_parse("NOVA_API_PORT", &mut self.api.port);
        env_parse("API_SLOW_REQUEST_MS", &mut self.api.slow_request_ms);

        env_parse("PAGINATION_DEFAULT_PER_PAGE", &mut self.pagination.default_per_page);
        env_parse("PAGINATION_MAX_PER_PAGE", &mut self.pagination.max_per_page);

        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').filter_map(|o| non_empty(o.to_string())).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        env_parse("ACCESS_TTL_MIN", &mut self.security.access_ttl_minutes);
        env_parse("REFRESH_TTL_DAYS", &mut self.security.refresh_ttl_days);
        env_string("ADMIN_EMAIL", &mut self.security.admin_email);
        env_string("ADMIN_PASSWORD", &mut self.security.admin_password);

        self.fit_pagination_to_filter();
        self
    }

    /// A page may never be larger than the filter limit, otherwise SQL would
    /// silently return fewer rows than `per_page` reports.
    fn fit_pagination_to_filter(&mut self) {
        let Some(max_limit) = self.filter.max_limit.and_then(|max| u32::try_from(max).ok()) else {
            return;
        };
        if self.pagination.max_per_page > max_limit {
            tracing::warn!(
                "PAGINATION_MAX_PER_PAGE {} exceeds FILTER_MAX_LIMIT {}, lowering it",
                self.pagination.max_per_page,
                max_limit
            );
            self.pagination.max_per_page = max_limit;
        }
        self.pagination.max_per_page = self.pagination.max_per_page.max(1);
        self.pagination.default_per_page = self.pagination.default_per_page.clamp(1, self.pagination.max_per_page);
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            filter: FilterConfig {
                max_limit: Some(1000),
                debug_logging: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 5,
                statement_timeout_ms: 8000,
                fixture: None,
            },
            api: ApiConfig {
                app_name: "NovaProfile API".to_string(),
                v1_prefix: "/api/v1".to_string(),
                port: 8000,
                slow_request_ms: 300,
            },
            pagination: PaginationConfig {
                default_per_page: 30,
                max_per_page: 200,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:5173".to_string()],
                jwt_secret: "change-me-dev-secret-please".to_string(),
                access_ttl_minutes: 15,
                refresh_ttl_days: 7,
                admin_email: None,
                admin_password: None,
            },
        }
    }

    pub fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.filter = FilterConfig {
            max_limit: Some(500),
            debug_logging: false,
        };
        config.database.max_connections = 10;
        config.database.connection_timeout = 10;
        config.security.cors_origins = vec![];
        config.security.jwt_secret = String::new();
        config
    }

    pub fn production() -> Self {
        let mut config = Self::staging();
        config.environment = Environment::Production;
        config.filter.max_limit = Some(200);
        config.database.max_connections = 20;
        config.api.slow_request_ms = 1000;
        config
    }
}

/// Overwrites `target` when `key` is set and parses; otherwise keeps the default
fn env_parse<T: FromStr>(key: &str, target: &mut T) {
    if let Some(value) = env::var(key).ok().and_then(|v| v.trim().parse().ok()) {
        *target = value;
    }
}

/// Set-but-blank clears the value
fn env_string(key: &str, target: &mut Option<String>) {
    if let Ok(v) = env::var(key) {
        *target = non_empty(v);
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Process-wide configuration, read from the environment on first use
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
