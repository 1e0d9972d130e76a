// SPDX-License-Identifier: MIT

//! Contest routes: public listing with optional bookmark annotation,
//! per-user bookmarks, and admin maintenance operations.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::models::{Bookmark, Contest, ContestStatus, Platform};
use crate::AppState;

/// Routes served to anonymous and logged-in callers alike. The caller
/// applies `optional_auth` so bookmark annotation works when a token is
/// present.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contests", get(list_contests))
        .route("/api/contests/{id}", get(get_contest))
}

/// Bookmark routes. The caller applies `require_auth`.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contests/bookmark", post(add_bookmark))
        .route("/api/contests/bookmark/{contest_id}", delete(remove_bookmark))
        .route("/api/contests/bookmarks/me", get(list_bookmarked))
}

/// Admin maintenance routes. The caller applies `require_auth` and
/// `require_admin`.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contests/solution", post(set_solution))
        .route("/api/contests/refresh", post(refresh_contests))
        .route("/api/contests/refresh-solutions", post(refresh_solutions))
}

/// Contest as exposed over the API. `id` is the store document ID, usable
/// directly in the bookmark endpoints. `isBookmarked` appears only for
/// authenticated callers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestResponse {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub duration: i64,
    pub status: ContestStatus,
    pub solution_url: Option<String>,
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
}

impl ContestResponse {
    fn from_contest(contest: Contest, is_bookmarked: Option<bool>) -> Self {
        Self {
            id: contest.document_id(),
            name: contest.name,
            platform: contest.platform,
            url: contest.url,
            start_time: contest.start_time,
            end_time: contest.end_time,
            duration: contest.duration,
            status: contest.status,
            solution_url: contest.solution_url,
            external_id: contest.external_id,
            is_bookmarked,
        }
    }
}

#[derive(Serialize)]
pub struct ContestListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ContestResponse>,
}

#[derive(Serialize)]
pub struct ContestEnvelope {
    pub success: bool,
    pub data: ContestResponse,
}

#[derive(Deserialize)]
pub struct ContestsQuery {
    /// Comma-separated platform names; unknown tokens are ignored.
    pub platforms: Option<String>,
    pub status: Option<String>,
}

async fn bookmarked_ids(state: &AppState, username: &str) -> Result<HashSet<String>> {
    let bookmarks = state.store.bookmarks_for_user(username).await?;
    Ok(bookmarks.into_iter().map(|b| b.contest).collect())
}

/// List contests with optional platform/status filters.
async fn list_contests(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Query(params): Query<ContestsQuery>,
) -> Result<Json<ContestListResponse>> {
    let platforms: Vec<Platform> = params
        .platforms
        .as_deref()
        .map(|list| list.split(',').filter_map(Platform::parse).collect())
        .unwrap_or_default();
    let status = params.status.as_deref().and_then(ContestStatus::parse);

    let contests = state.store.query_contests(&platforms, status).await?;

    let bookmarked = match &user {
        Some(auth_user) => Some(bookmarked_ids(&state, &auth_user.username).await?),
        None => None,
    };

    let data: Vec<ContestResponse> = contests
        .into_iter()
        .map(|contest| {
            let annotation = bookmarked
                .as_ref()
                .map(|ids| ids.contains(&contest.document_id()));
            ContestResponse::from_contest(contest, annotation)
        })
        .collect();

    Ok(Json(ContestListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Fetch a single contest by document ID.
async fn get_contest(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Path(id): Path<String>,
) -> Result<Json<ContestEnvelope>> {
    let contest = state
        .store
        .get_contest(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

    let annotation = match &user {
        Some(auth_user) => {
            Some(bookmarked_ids(&state, &auth_user.username).await?.contains(&id))
        }
        None => None,
    };

    Ok(Json(ContestEnvelope {
        success: true,
        data: ContestResponse::from_contest(contest, annotation),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPayload {
    pub contest_id: String,
}

#[derive(Serialize)]
pub struct BookmarkEnvelope {
    pub success: bool,
    pub data: Bookmark,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Bookmark a contest for the current user.
async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<BookmarkPayload>,
) -> Result<(StatusCode, Json<BookmarkEnvelope>)> {
    // The contest must exist; bookmarks never dangle at creation time.
    if state.store.get_contest(&payload.contest_id).await?.is_none() {
        return Err(AppError::NotFound("Contest not found".to_string()));
    }

    let bookmark = state
        .store
        .create_bookmark(&auth_user.username, &payload.contest_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Contest already bookmarked".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(BookmarkEnvelope {
            success: true,
            data: bookmark,
        }),
    ))
}

/// Remove a bookmark.
async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(contest_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let removed = state
        .store
        .delete_bookmark(&auth_user.username, &contest_id)
        .await?;
    if !removed {
        return Err(AppError::NotFound("Bookmark not found".to_string()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Bookmark removed".to_string(),
    }))
}

/// List the current user's bookmarked contests.
async fn list_bookmarked(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ContestListResponse>> {
    let bookmarks = state.store.bookmarks_for_user(&auth_user.username).await?;

    let mut data = Vec::with_capacity(bookmarks.len());
    for bookmark in bookmarks {
        // A contest can disappear after being bookmarked (manual cleanup);
        // such bookmarks are skipped rather than surfaced as errors.
        if let Some(contest) = state.store.get_contest(&bookmark.contest).await? {
            data.push(ContestResponse::from_contest(contest, Some(true)));
        }
    }

    Ok(Json(ContestListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SolutionPayload {
    pub contest_id: String,
    #[validate(url(message = "solutionUrl must be a valid URL"))]
    pub solution_url: String,
}

/// Manually attach a solution link to a contest.
async fn set_solution(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SolutionPayload>,
) -> Result<Json<ContestEnvelope>> {
    payload.validate()?;

    let contest = state
        .store
        .set_solution(&payload.contest_id, &payload.solution_url)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

    tracing::info!(contest_id = %payload.contest_id, "Solution link set manually");

    Ok(Json(ContestEnvelope {
        success: true,
        data: ContestResponse::from_contest(contest, None),
    }))
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub processed: usize,
}

/// Trigger an immediate contest refresh cycle.
async fn refresh_contests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>> {
    let processed = state.aggregator.refresh_contests().await?;

    Ok(Json(RefreshResponse {
        success: true,
        message: "Contests refreshed successfully".to_string(),
        processed,
    }))
}

/// Trigger an immediate solution enrichment cycle.
async fn refresh_solutions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>> {
    let updated = state.solutions.refresh_solutions().await?;

    Ok(Json(RefreshResponse {
        success: true,
        message: "Solution links refreshed successfully".to_string(),
        processed: updated,
    }))
}
