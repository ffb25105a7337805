// handlers/mod.rs - two-tier handler layout
//
// Public (no auth) -> Protected (bearer access token, active user)
pub mod protected; // Tier 2: JWT required (/api/v1/*)
pub mod public; // Tier 1: no authentication (/, /health, /dbz, /api/v1/auth/login|refresh)
