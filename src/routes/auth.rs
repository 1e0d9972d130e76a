// SPDX-License-Identifier: MIT

//! Account routes: registration, login, profile, preferences.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::{hash_password, Preferences, User};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

/// Routes reachable without a token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Routes requiring authentication. The caller applies `require_auth`.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/preferences", put(update_preferences))
}

/// User as exposed over the API. Never carries the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub preferences: Preferences,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            preferences: user.preferences,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    pub data: UserResponse,
}

#[derive(Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PreferencesPayload {
    pub preferences: Preferences,
}

fn validate_username_charset(username: &str) -> Result<()> {
    let ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Username may only contain letters, digits, '_' and '-'".to_string(),
        ))
    }
}

/// Create an account and return a session token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    payload.validate()?;
    validate_username_charset(&payload.username)?;

    if state.store.get_user(&payload.username).await?.is_some()
        || state
            .store
            .find_user_by_email(&payload.email)
            .await?
            .is_some()
    {
        return Err(AppError::BadRequest(
            "A user with this username or email already exists".to_string(),
        ));
    }

    let user = User {
        username: payload.username,
        email: payload.email,
        password_hash: hash_password(&payload.password)?,
        is_admin: false,
        preferences: Preferences::default(),
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };
    state.store.create_user(&user).await?;

    let token = create_jwt(
        &user.username,
        &state.config.jwt_signing_key,
        state.config.jwt_expiry_days,
    )?;

    tracing::info!(username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            token,
            user: user.into(),
        }),
    ))
}

/// Exchange email + password for a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<SessionResponse>> {
    payload.validate()?;

    let user = state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.verify_password(&payload.password) {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(
        &user.username,
        &state.config.jwt_signing_key,
        state.config.jwt_expiry_days,
    )?;

    tracing::debug!(username = %user.username, "User logged in");

    Ok(Json(SessionResponse {
        success: true,
        token,
        user: user.into(),
    }))
}

/// Current user's profile.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserEnvelope>> {
    let user = state
        .store
        .get_user(&auth_user.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserEnvelope {
        success: true,
        data: user.into(),
    }))
}

/// Replace the current user's preferences.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<PreferencesPayload>,
) -> Result<Json<UserEnvelope>> {
    let user = state
        .store
        .update_preferences(&auth_user.username, &payload.preferences)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserEnvelope {
        success: true,
        data: user.into(),
    }))
}
