//! Authentication: JWT sessions, the bearer-token extractor and password
//! digests.
//!
//! Passwords are stored as Argon2id PHC strings.

use crate::handlers::{AppError, AppState};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use colloquy_domain::{EntityId, PasswordDigest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Session management error
#[derive(Debug, Error)]
pub enum SessionError {
    /// JWT encoding failed
    #[error("Failed to encode JWT: {0}")]
    JwtEncode(#[from] jsonwebtoken::errors::Error),

    /// Token expired
    #[error("Session token expired")]
    TokenExpired,

    /// Invalid token
    #[error("Invalid session token")]
    InvalidToken,
}

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Id of the logged-in user
    pub user_id: String,

    /// Name of the logged-in user at login time
    pub name: String,

    /// Token expiration timestamp (Unix epoch)
    pub exp: u64,

    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
}

/// Session manager handles JWT token generation and validation
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SessionManager {
    /// Create a new session manager with the given JWT secret and expiry
    pub fn new(jwt_secret: &str, token_expiry_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry_secs,
        }
    }

    /// Generate a new session token for the given user
    pub fn generate_token(&self, user_id: EntityId, name: &str) -> Result<String, SessionError> {
        let now = now_secs();
        let claims = SessionClaims {
            user_id: user_id.to_string(),
            name: name.to_string(),
            exp: now + self.token_expiry_secs,
            iat: now,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a session token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::default();
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }
}

/// The caller, resolved from an `Authorization: Bearer <token>` header
///
/// Handlers take this as an argument to require authentication; the actor
/// id of every mutation comes from here, never from the request body.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Authenticated user id
    pub id: EntityId,
    /// User name carried in the token
    pub name: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthenticated("Expected a bearer token".to_string()))?;

        let claims = state.sessions.validate_token(token.trim())?;
        let id = EntityId::from_string(&claims.user_id)
            .map_err(|_| AppError::Session(SessionError::InvalidToken))?;

        Ok(AuthUser {
            id,
            name: claims.name,
        })
    }
}

/// Salt and hash a plain password with Argon2id
///
/// The salt is 16 random bytes taken from a v4 UUID.
pub fn hash_password(password: &str) -> Result<PasswordDigest, AppError> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Internal(format!("Password salt failed: {}", e)))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(PasswordDigest {
        hash: hash.to_string(),
        salt: salt.as_str().to_string(),
    })
}

/// Check a plain password against a stored digest
///
/// Parameters and salt are read back from the PHC string, so digests made
/// with other Argon2 settings still verify.
pub fn verify_password(password: &str, stored: &PasswordDigest) -> bool {
    match PasswordHash::new(&stored.hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
