// handlers/protected/mod.rs - endpoints behind the bearer access token
//
// Every route here runs after `jwt_auth_middleware`, so handlers can take
// `Extension<AuthUser>` for the resolved caller.
pub mod employees;
pub mod me;
pub mod org;
pub mod roles;
pub mod succession;
pub mod utils;
pub mod vacancies;
