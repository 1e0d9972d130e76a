// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use chrono::{Duration, Utc};
use contest_tracker::config::Config;
use contest_tracker::db::{MemoryStore, Store};
use contest_tracker::middleware::auth::create_jwt;
use contest_tracker::models::{
    hash_password, ContestStatus, FetchedContest, Platform, Preferences, User,
};
use contest_tracker::routes::create_router;
use contest_tracker::services::{
    AggregatorService, CodeChefClient, CodeforcesClient, LeetCodeClient, SolutionService,
};
use contest_tracker::AppState;
use std::sync::Arc;

/// Create a test app backed by the in-memory store. No network calls are
/// made unless a test explicitly triggers a refresh.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let http = reqwest::Client::new();

    let aggregator = AggregatorService::new(
        CodeforcesClient::new(http.clone()),
        CodeChefClient::new(http.clone()),
        LeetCodeClient::new(http),
        store.clone(),
    );
    let solutions = SolutionService::new(None, Vec::new(), store.clone());

    let state = Arc::new(AppState {
        config,
        store,
        aggregator,
        solutions,
    });

    (create_router(state.clone()), state)
}

/// Insert a user directly into the store and return a valid session token.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, username: &str, is_admin: bool) -> String {
    let user = User {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: hash_password("hunter22").expect("hash"),
        is_admin,
        preferences: Preferences::default(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
    };
    state.store.create_user(&user).await.expect("seed user");

    create_jwt(
        username,
        &state.config.jwt_signing_key,
        state.config.jwt_expiry_days,
    )
    .expect("token")
}

/// Insert a contest via the upsert path. `start_offset_minutes` is relative
/// to now; status is derived from the offsets. Returns the document ID.
#[allow(dead_code)]
pub async fn seed_contest(
    state: &AppState,
    platform: Platform,
    external_id: &str,
    name: &str,
    start_offset_minutes: i64,
    duration_minutes: i64,
) -> String {
    let now = Utc::now();
    let start = now + Duration::minutes(start_offset_minutes);
    let end = start + Duration::minutes(duration_minutes);

    let fetched = FetchedContest {
        name: name.to_string(),
        platform,
        url: format!("https://example.com/{}/{}", platform, external_id),
        start_time: start,
        end_time: end,
        duration: duration_minutes,
        status: ContestStatus::derive(start, end, now),
        external_id: external_id.to_string(),
    };
    let id = fetched.document_id();
    state.store.upsert_contest(&fetched).await.expect("seed contest");
    id
}

/// Build a JSON request with an optional bearer token.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
