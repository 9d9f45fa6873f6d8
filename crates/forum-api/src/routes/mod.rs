//! Route definitions
//!
//! Paths match the forum pages' forms and scripts, so nothing is nested
//! under a version prefix.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, oauth, profile, reactions};
use crate::state::AppState;

/// Create the main router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(oauth_routes())
        .merge(reaction_routes())
        .merge(profile_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Local accounts and guests
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/login-guest", get(auth::login_guest))
        .route("/logout", get(auth::logout))
}

/// Federated login
fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/:provider/login", get(oauth::login))
        .route("/auth/:provider/callback", get(oauth::callback))
}

/// Thread and comment reactions
fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route("/like-dislike", post(reactions::react_to_thread))
        .route("/like-dislike/change", post(reactions::change_thread_reaction))
        .route("/comment-like-dislike", post(reactions::react_to_comment))
        .route(
            "/comment-like-dislike/change",
            post(reactions::change_comment_reaction),
        )
        .route("/thread", get(reactions::thread_summary))
}

/// JSON endpoints for the profile page
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/get-current-user", get(profile::current_user))
        .route("/api/profile/reactions", get(profile::reactions))
        .route("/api/profile/provider", get(profile::provider_session))
}
