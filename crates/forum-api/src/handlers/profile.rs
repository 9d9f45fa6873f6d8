//! Profile handlers
//!
//! JSON endpoints used by the profile page scripts.

use axum::{extract::State, Json};
use forum_service::dto::{CurrentUserResponse, ProfileReactionsResponse, ProviderSessionResponse};
use forum_service::{OAuthService, ReactionService};

use crate::extractors::{CurrentIdentity, SessionCookies};
use crate::response::ApiResult;
use crate::state::AppState;

/// Who the session cookie belongs to
///
/// GET /api/get-current-user
pub async fn current_user(CurrentIdentity(identity): CurrentIdentity) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse::from(&identity))
}

/// Threads and comments the caller reacted to
///
/// GET /api/profile/reactions
pub async fn reactions(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> ApiResult<Json<ProfileReactionsResponse>> {
    let profile = ReactionService::new(state.service_context())
        .user_reactions(&identity)
        .await?;
    Ok(Json(profile))
}

/// Metadata of the linked provider session
///
/// GET /api/profile/provider
pub async fn provider_session(
    State(state): State<AppState>,
    _identity: CurrentIdentity,
    cookies: SessionCookies,
) -> ApiResult<Json<ProviderSessionResponse>> {
    let session = OAuthService::new(state.service_context())
        .provider_session(cookies.provider_session.as_deref())
        .await?;
    Ok(Json(session))
}
