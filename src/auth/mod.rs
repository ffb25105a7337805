use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Role granted to the identity configured through `ADMIN_EMAIL`
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    SecretNotConfigured,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Expected {expected} token, got {found}")]
    WrongTokenType { expected: TokenType, found: TokenType },

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Normalized email of the subject
    pub sub: String,
    pub typ: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: &str, typ: TokenType, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let ttl = match typ {
            TokenType::Access => Duration::minutes(security.access_ttl_minutes),
            TokenType::Refresh => Duration::days(security.refresh_ttl_days),
        };
        Self {
            sub: sub.to_string(),
            typ,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }
    let key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key).map_err(|e| AuthError::Encoding(e.to_string()))
}

/// Issues a fresh access and refresh token for `email`
pub fn issue_pair(email: &str, security: &SecurityConfig) -> Result<TokenPair, AuthError> {
    let sub = normalize_email(email);
    Ok(TokenPair {
        access: generate_jwt(&Claims::new(&sub, TokenType::Access, security), security)?,
        refresh: generate_jwt(&Claims::new(&sub, TokenType::Refresh, security), security)?,
    })
}

/// Verifies signature and expiry, then checks the token type
pub fn decode_token(token: &str, expected: TokenType, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }
    let key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let claims = decode::<Claims>(token, &key, &validation)
        .map_err(|e| AuthError::InvalidToken(format!("{:?}", e.kind())))?
        .claims;

    if claims.typ != expected {
        return Err(AuthError::WrongTokenType { expected, found: claims.typ });
    }
    if claims.sub.trim().is_empty() {
        return Err(AuthError::InvalidToken("empty subject".to_string()));
    }
    Ok(claims)
}

/// Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Checks `password` against a stored hash.
///
/// New hashes are argon2; bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) from older
/// accounts are still accepted. Empty or unparseable hashes verify false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if stored_hash.is_empty() {
        return false;
    }
    if is_bcrypt_hash(stored_hash) {
        return bcrypt::verify(password, stored_hash).unwrap_or(false);
    }
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"].iter().any(|prefix| hash.starts_with(prefix))
}

/// Whether `email` is the configured admin identity
pub fn is_admin_email(email: &str, security: &SecurityConfig) -> bool {
    match security.admin_email.as_deref() {
        Some(admin) => normalize_email(admin) == normalize_email(email),
        None => false,
    }
}

/// Env admin credentials check, usable without a store
pub fn admin_login_matches(email: &str, password: &str, security: &SecurityConfig) -> bool {
    match security.admin_password.as_deref() {
        Some(admin_password) => is_admin_email(email, security) && password == admin_password,
        None => false,
    }
}
