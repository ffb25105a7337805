pub mod access_log;
pub mod auth;
pub mod response;

pub use access_log::slow_request_log;
pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
