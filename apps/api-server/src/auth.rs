//! JWT authentication module.
//!
//! Two pieces live here:
//! - [`JwtManager`] signs and validates the session tokens handed out by
//!   the login endpoint.
//! - [`CredentialVerifier`] is the seam between the login handler and
//!   credential storage. The production implementation checks argon2
//!   hashes in the users table; tests can inject anything.

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use ured_db::repository::user;
use ured_db::UserRepository;

// =============================================================================
// Claims & Token Manager
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Login name
    pub username: String,

    /// Role label ("direktor", "komercijala", "izvodjac")
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a session token for an authenticated user.
    pub fn generate_token(&self, user_id: &str, username: &str, role: &str) -> ApiResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Guard middleware for the resource routes.
///
/// Rejects requests without a valid bearer token and attaches the decoded
/// [`Claims`] as a request extension for handlers that need the caller.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))?;

    let claims = state.jwt.validate_token(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

// =============================================================================
// Credential Verification
// =============================================================================

/// A user identity confirmed by a [`CredentialVerifier`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// Checks a username/password pair against credential storage.
///
/// Returns `Ok(None)` for unknown users and wrong passwords alike; the
/// login handler turns both into the same 401.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> ApiResult<Option<VerifiedUser>>;
}

/// Production verifier backed by the users table.
pub struct DbCredentialVerifier {
    users: UserRepository,
}

impl DbCredentialVerifier {
    pub fn new(users: UserRepository) -> Self {
        DbCredentialVerifier { users }
    }
}

#[async_trait]
impl CredentialVerifier for DbCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> ApiResult<Option<VerifiedUser>> {
        let Some(stored) = self.users.find_by_username(username).await? else {
            debug!(username = %username, "Login attempt for unknown user");
            return Ok(None);
        };

        if !user::verify_password(password, &stored.password_hash) {
            debug!(username = %username, "Password mismatch");
            return Ok(None);
        }

        Ok(Some(VerifiedUser {
            id: stored.id,
            username: stored.username,
            role: stored.role,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.generate_token("u-1", "samir", "direktor").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.username, "samir");
        assert_eq!(claims.role, "direktor");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        let other = JwtManager::new("other-secret".to_string(), 3600);

        let token = manager.generate_token("u-1", "samir", "direktor").unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
