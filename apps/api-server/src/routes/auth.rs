//! Login endpoint.
//!
//! Credentials are checked through the injected [`CredentialVerifier`];
//! unknown users and wrong passwords both produce the same 401 so the
//! response doesn't reveal which usernames exist.
//!
//! [`CredentialVerifier`]: crate::auth::CredentialVerifier

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::VerifiedUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: VerifiedUser,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let user = state
        .verifier
        .verify(req.username.trim(), &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let token = state.jwt.generate_token(&user.id, &user.username, &user.role)?;
    info!(username = %user.username, role = %user.role, "User logged in");

    Ok(Json(LoginResponse { token, user }))
}
