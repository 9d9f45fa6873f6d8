//! HTTP-level tests of the forum server
//!
//! Every test spawns its own server on the in-memory stores, so no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use forum_core::ReactionStore;
use futures::future::join_all;
use integration_tests::{
    assert_error, assert_json, assert_redirect, comment_form, location, login_form,
    register_form, thread_form, unique_username, Browser, TestServer, REJECTED_CODE,
};
use reqwest::StatusCode;
use serde_json::Value;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut browser = Browser::default();

    let response = server.get("/health", &mut browser).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health/ready", &mut browser).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Local Account Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    let server = TestServer::start().await.unwrap();
    let username = unique_username();
    let mut browser = server.sign_up(&username).await.unwrap();
    assert!(browser.cookie("session_token").is_some());

    let response = server.get("/api/get-current-user", &mut browser).await.unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["username"], username.as_str());
    assert_eq!(me["is_guest"], false);
    assert!(me["user_id"].as_i64().is_some());
}

#[tokio::test]
async fn test_register_conflicts_and_bad_logins() {
    let server = TestServer::start().await.unwrap();
    let username = unique_username();
    server.sign_up(&username).await.unwrap();
    let mut browser = Browser::default();

    let response = server
        .post_form("/register", &mut browser, &register_form(&username))
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .post_form("/register", &mut browser, &register_form("guest"))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_form("/login", &mut browser, &login_form(&username, "wrong password"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
    assert!(browser.cookie("session_token").is_none());
}

#[tokio::test]
async fn test_missing_and_forged_cookies() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;

    let mut anonymous = Browser::default();
    let response = server.get("/api/get-current-user", &mut anonymous).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTH");

    let mut forged = Browser::default();
    forged.set_cookie("session_token", "eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl");
    let response = server.get("/api/get-current-user", &mut forged).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_SIGNATURE");

    // Read paths fall back to the anonymous guest
    let response = server
        .get(&format!("/thread?id={thread_id}"), &mut forged)
        .await
        .unwrap();
    let summary: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary["viewer"]["username"], "Guest");
    assert_eq!(summary["viewer"]["is_guest"], true);
}

#[tokio::test]
async fn test_guest_can_read_but_not_react() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;
    let mut guest = Browser::default();

    let response = server.get("/login-guest", &mut guest).await.unwrap();
    assert_redirect(&response, "/index").unwrap();

    let response = server.get("/api/get-current-user", &mut guest).await.unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["username"], "guest");
    assert_eq!(me["is_guest"], true);

    let response = server
        .post_form("/like-dislike", &mut guest, &thread_form(thread_id, "1"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "GUEST_NOT_ALLOWED");

    let response = server
        .get(&format!("/thread?id={thread_id}"), &mut guest)
        .await
        .unwrap();
    let summary: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary["likes"], 0);
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_thread_reaction_counts_once() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;
    let mut alice = server.sign_up(&unique_username()).await.unwrap();

    let response = server
        .post_form("/like-dislike", &mut alice, &thread_form(thread_id, "1"))
        .await
        .unwrap();
    assert_redirect(&response, &format!("/thread?id={thread_id}")).unwrap();

    let response = server
        .post_form("/like-dislike", &mut alice, &thread_form(thread_id, "-1"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ALREADY_REACTED");

    let response = server
        .get(&format!("/thread?id={thread_id}"), &mut alice)
        .await
        .unwrap();
    let summary: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary["likes"], 1);
    assert_eq!(summary["dislikes"], 0);
    assert_eq!(summary["viewer_reactions"][0]["like_type"], 1);
}

#[tokio::test]
async fn test_reaction_input_errors() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;
    let mut alice = server.sign_up(&unique_username()).await.unwrap();

    for form in [
        thread_form(thread_id, "2"),
        thread_form(thread_id, "like"),
        thread_form("abc", "1"),
        thread_form(thread_id, ""),
        thread_form(thread_id, "+1"),
        thread_form(thread_id, "01"),
        thread_form(thread_id, "-01"),
        thread_form(thread_id, " 1 "),
    ] {
        let response = server.post_form("/like-dislike", &mut alice, &form).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form:?}");
    }

    let response = server
        .post_form("/like-dislike", &mut alice, &thread_form(thread_id.into_inner() + 1000, "1"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_THREAD");

    let response = server.get("/like-dislike", &mut alice).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = server.get("/thread?id=zero", &mut alice).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_reaction_ignores_claimed_user() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;
    let comment_id = server.store.create_comment(thread_id).await.unwrap();
    let mut alice = server.sign_up(&unique_username()).await.unwrap();

    let mut form = comment_form(comment_id, thread_id, "-1");
    form.push(("user_id", "999999".to_string()));
    let response = server
        .post_form("/comment-like-dislike", &mut alice, &form)
        .await
        .unwrap();
    assert_redirect(&response, &format!("/thread?id={thread_id}")).unwrap();

    let response = server
        .post_form("/comment-like-dislike", &mut alice, &form)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get("/api/profile/reactions", &mut alice).await.unwrap();
    let profile: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile["disliked_comments"], serde_json::json!([comment_id]));

    let response = server
        .get(&format!("/thread?id={thread_id}"), &mut alice)
        .await
        .unwrap();
    let summary: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary["comments"][0]["dislikes"], 1);
}

#[tokio::test]
async fn test_change_reaction_flow() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;
    let mut alice = server.sign_up(&unique_username()).await.unwrap();

    let response = server
        .post_form("/like-dislike/change", &mut alice, &thread_form(thread_id, "-1"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_REACTED");

    for (path, like_type) in [("/like-dislike", "1"), ("/like-dislike/change", "-1")] {
        let response = server
            .post_form(path, &mut alice, &thread_form(thread_id, like_type))
            .await
            .unwrap();
        assert_redirect(&response, &format!("/thread?id={thread_id}")).unwrap();
    }

    let response = server
        .get(&format!("/thread?id={thread_id}"), &mut alice)
        .await
        .unwrap();
    let summary: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary["likes"], 0);
    assert_eq!(summary["dislikes"], 1);
    assert_eq!(server.store.changes().await.len(), 1);
}

#[tokio::test]
async fn test_parallel_posts_from_one_user() {
    let server = TestServer::start().await.unwrap();
    let thread_id = server.store.create_thread().await;
    let alice = server.sign_up(&unique_username()).await.unwrap();

    let posts = (0..8).map(|_| {
        let mut browser = alice.clone();
        let server = &server;
        async move {
            server
                .post_form("/like-dislike", &mut browser, &thread_form(thread_id, "1"))
                .await
                .unwrap()
                .status()
        }
    });
    let statuses = join_all(posts).await;

    let accepted = statuses.iter().filter(|s| **s == StatusCode::SEE_OTHER).count();
    let rejected = statuses.iter().filter(|s| **s == StatusCode::FORBIDDEN).count();
    assert_eq!((accepted, rejected), (1, 7));

    let counters = server.store.thread_counters(thread_id).await.unwrap().unwrap();
    assert_eq!(counters.likes, 1);
}

// ============================================================================
// Federated Login Tests
// ============================================================================

async fn begin_github_login(server: &TestServer, browser: &mut Browser) -> String {
    let response = server.get("/auth/github/login", browser).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let url = location(&response).expect("authorize url");
    assert!(url.starts_with("https://github.test/"));
    url.split("state=").nth(1).expect("state").to_string()
}

#[tokio::test]
async fn test_github_login_round_trip() {
    let server = TestServer::start().await.unwrap();
    let mut browser = Browser::default();

    let state = begin_github_login(&server, &mut browser).await;
    let response = server
        .get(&format!("/auth/github/callback?code=abc&state={state}"), &mut browser)
        .await
        .unwrap();
    assert_redirect(&response, "/index").unwrap();
    assert!(browser.cookie("oauth_session").is_some());

    let response = server.get("/api/get-current-user", &mut browser).await.unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["username"], "github:octocat");
    assert_eq!(me["provider"], "github");

    let response = server.get("/api/profile/provider", &mut browser).await.unwrap();
    let session: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(session["provider"], "github");
    assert!(session.get("access_token").is_none());

    // Replaying the callback fails: the state was consumed
    let response = server
        .get(&format!("/auth/github/callback?code=abc&state={state}"), &mut browser)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_OAUTH_STATE");

    let response = server.get("/logout", &mut browser).await.unwrap();
    assert_redirect(&response, "/").unwrap();
    assert!(browser.cookie("session_token").is_none());
    assert!(browser.cookie("oauth_session").is_none());
    assert!(server.provider_sessions.is_empty());
}

#[tokio::test]
async fn test_logout_clears_cookies_when_redis_is_down() {
    let server = TestServer::start().await.unwrap();
    let mut browser = Browser::default();

    let state = begin_github_login(&server, &mut browser).await;
    let response = server
        .get(&format!("/auth/github/callback?code=abc&state={state}"), &mut browser)
        .await
        .unwrap();
    assert_redirect(&response, "/index").unwrap();

    server.provider_sessions.set_unavailable(true);
    let response = server.get("/logout", &mut browser).await.unwrap();
    assert_redirect(&response, "/").unwrap();
    assert!(browser.cookie("session_token").is_none());
    assert!(browser.cookie("oauth_session").is_none());
}

#[tokio::test]
async fn test_failed_federation_redirects_home() {
    let server = TestServer::start().await.unwrap();
    let mut browser = Browser::default();

    let state = begin_github_login(&server, &mut browser).await;
    let response = server
        .get(
            &format!("/auth/github/callback?code={REJECTED_CODE}&state={state}"),
            &mut browser,
        )
        .await
        .unwrap();
    assert_redirect(&response, "/").unwrap();
    assert!(browser.cookie("session_token").is_none());

    let response = server
        .get("/auth/github/callback?error=access_denied", &mut browser)
        .await
        .unwrap();
    assert_redirect(&response, "/").unwrap();

    for path in ["/auth/google/login", "/auth/myspace/login"] {
        let response = server.get(path, &mut browser).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
