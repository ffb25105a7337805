// handlers/public/mod.rs - endpoints that do not require a token
//
// Service info, liveness/readiness probes and token acquisition.
pub mod auth;
pub mod health;
