// SPDX-License-Identifier: MIT

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Authentication state for routes that serve both public and logged-in
/// callers. Always present as an extension once `optional_auth` has run.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

fn bearer_token(request: &Request) -> Option<String> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

fn decode_token(token: &str, signing_key: &[u8]) -> Result<AuthUser, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    Ok(AuthUser {
        username: token_data.claims.sub,
    })
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let auth_user = decode_token(&token, &state.config.jwt_signing_key)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Middleware for public routes that behave differently for logged-in
/// callers (bookmark annotation). A missing or invalid token is not an
/// error; the request proceeds unauthenticated.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = bearer_token(&request)
        .and_then(|token| decode_token(&token, &state.config.jwt_signing_key).ok());

    request.extensions_mut().insert(MaybeUser(user));
    next.run(request).await
}

/// Middleware gating admin-only operations. Must run after `require_auth`;
/// the admin flag lives in the store, not in the token, so revoking it
/// takes effect immediately.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let user = state.store.get_user(&auth_user.username).await?;
    match user {
        Some(user) if user.is_admin => Ok(next.run(request).await),
        _ => Err(AppError::Forbidden("Admin privilege required".to_string())),
    }
}

/// Create a JWT for a user session.
pub fn create_jwt(username: &str, signing_key: &[u8], expiry_days: i64) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: username.to_string(),
        iat: now,
        exp: now + (expiry_days.max(0) as usize) * 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
