// SPDX-License-Identifier: MIT

//! Contest API tests: listing with filters, bookmark annotation, bookmark
//! lifecycle, and admin-only maintenance routes.

use axum::http::StatusCode;
use contest_tracker::models::Platform;
use serde_json::json;
use tower::ServiceExt;

mod common;

use common::{body_json, create_test_app, json_request, seed_contest, seed_user};

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_contests_anonymous_has_no_bookmark_field() {
    let (app, state) = create_test_app();
    seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let response = app
        .oneshot(json_request("GET", "/api/contests", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    let contest = &body["data"][0];
    assert_eq!(contest["id"], "codeforces-2000");
    assert_eq!(contest["platform"], "codeforces");
    assert_eq!(contest["status"], "upcoming");
    assert_eq!(contest["solutionUrl"], serde_json::Value::Null);
    // Anonymous callers never see the annotation, not even as false.
    assert!(contest.get("isBookmarked").is_none());
}

#[tokio::test]
async fn test_list_contests_platform_filter() {
    let (app, state) = create_test_app();
    seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;
    seed_contest(&state, Platform::Leetcode, "410", "Weekly Contest 410", 90, 90).await;
    seed_contest(&state, Platform::Codechef, "LTIME100", "Lunchtime 100", 120, 180).await;

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/contests?platforms=codeforces,leetcode",
            None,
            None,
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    for contest in body["data"].as_array().unwrap() {
        assert_ne!(contest["platform"], "codechef");
    }
}

#[tokio::test]
async fn test_list_contests_unknown_platform_token_ignored() {
    let (app, state) = create_test_app();
    seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/contests?platforms=codeforces,atcoder",
            None,
            None,
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_list_contests_sorted_ascending_except_past() {
    let (app, state) = create_test_app();
    // Two upcoming, out of insertion order.
    seed_contest(&state, Platform::Codeforces, "2001", "Later", 240, 120).await;
    seed_contest(&state, Platform::Codeforces, "2000", "Sooner", 60, 120).await;
    // Two past.
    seed_contest(&state, Platform::Codeforces, "1900", "Old", -10_000, 120).await;
    seed_contest(&state, Platform::Codeforces, "1950", "Recent", -5_000, 120).await;

    let upcoming = body_json(
        app.clone()
            .oneshot(json_request("GET", "/api/contests?status=upcoming", None, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(upcoming["data"][0]["name"], "Sooner");
    assert_eq!(upcoming["data"][1]["name"], "Later");

    // Past lists most recent first.
    let past = body_json(
        app.oneshot(json_request("GET", "/api/contests?status=past", None, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(past["data"][0]["name"], "Recent");
    assert_eq!(past["data"][1]["name"], "Old");
}

#[tokio::test]
async fn test_get_contest_by_id_and_missing() {
    let (app, state) = create_test_app();
    let id = seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let response = app
        .clone()
        .oneshot(json_request("GET", &format!("/api/contests/{}", id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Round 2000");

    let missing = app
        .oneshot(json_request("GET", "/api/contests/codeforces-9999", None, None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookmark_lifecycle() {
    let (app, state) = create_test_app();
    let token = seed_user(&state, "alice", false).await;
    let id = seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    // Create
    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/contests/bookmark",
            Some(&token),
            Some(json!({ "contestId": id })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    // Duplicate is rejected without creating a second record
    let duplicate = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/contests/bookmark",
            Some(&token),
            Some(json!({ "contestId": id })),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    // The listing now annotates the bookmark for this caller
    let listed = body_json(
        app.clone()
            .oneshot(json_request("GET", "/api/contests", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["data"][0]["isBookmarked"], true);

    // Bookmarked listing returns the full contest
    let mine = body_json(
        app.clone()
            .oneshot(json_request(
                "GET",
                "/api/contests/bookmarks/me",
                Some(&token),
                None,
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(mine["count"], 1);
    assert_eq!(mine["data"][0]["id"], id);
    assert_eq!(mine["data"][0]["isBookmarked"], true);

    // Delete
    let removed = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/contests/bookmark/{}", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::OK);

    // Deleting again is a 404
    let gone = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/contests/bookmark/{}", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookmark_unknown_contest_is_not_found() {
    let (app, state) = create_test_app();
    let token = seed_user(&state, "alice", false).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/contests/bookmark",
            Some(&token),
            Some(json!({ "contestId": "codeforces-9999" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookmark_requires_auth() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/contests/bookmark",
            None,
            Some(json!({ "contestId": "codeforces-2000" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bookmarks_are_per_user() {
    let (app, state) = create_test_app();
    let alice = seed_user(&state, "alice", false).await;
    let bob = seed_user(&state, "bob", false).await;
    let id = seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/contests/bookmark",
            Some(&alice),
            Some(json!({ "contestId": id })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let bobs_view = body_json(
        app.oneshot(json_request("GET", "/api/contests", Some(&bob), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(bobs_view["data"][0]["isBookmarked"], false);
}

#[tokio::test]
async fn test_solution_update_requires_admin() {
    let (app, state) = create_test_app();
    let token = seed_user(&state, "alice", false).await;
    let id = seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/contests/solution",
            Some(&token),
            Some(json!({
                "contestId": id,
                "solutionUrl": "https://www.youtube.com/watch?v=abc"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_routes_require_auth() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/contests/refresh", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_sets_solution_link() {
    let (app, state) = create_test_app();
    let token = seed_user(&state, "root", true).await;
    let id = seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/contests/solution",
            Some(&token),
            Some(json!({
                "contestId": id,
                "solutionUrl": "https://www.youtube.com/watch?v=abc"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["solutionUrl"], "https://www.youtube.com/watch?v=abc");

    let stored = state.store.get_contest(&id).await.unwrap().unwrap();
    assert_eq!(
        stored.solution_url.as_deref(),
        Some("https://www.youtube.com/watch?v=abc")
    );
}

#[tokio::test]
async fn test_admin_solution_rejects_invalid_url() {
    let (app, state) = create_test_app();
    let token = seed_user(&state, "root", true).await;
    let id = seed_contest(&state, Platform::Codeforces, "2000", "Round 2000", 60, 120).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/contests/solution",
            Some(&token),
            Some(json!({
                "contestId": id,
                "solutionUrl": "not a url"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_solution_unknown_contest_is_not_found() {
    let (app, state) = create_test_app();
    let token = seed_user(&state, "root", true).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/contests/solution",
            Some(&token),
            Some(json!({
                "contestId": "codeforces-9999",
                "solutionUrl": "https://www.youtube.com/watch?v=abc"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
