//! Federated login handlers
//!
//! `GET /auth/:provider/login` redirects to the provider and
//! `GET /auth/:provider/callback` finishes the flow. A failed code exchange
//! sends the browser back to `/` instead of showing an error page.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use forum_core::IdentityProvider;
use forum_service::dto::OAuthCallbackQuery;
use forum_service::{OAuthService, ServiceError};
use tracing::warn;

use crate::extractors::{
    session_cookie, QueryParams, SessionCookies, PROVIDER_SESSION_COOKIE, SESSION_COOKIE,
};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

fn parse_provider(raw: &str) -> ApiResult<IdentityProvider> {
    raw.parse::<IdentityProvider>()
        .map_err(|_| ServiceError::not_found("Provider", raw).into())
}

/// Start the authorization-code flow
///
/// GET /auth/:provider/login
pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult<Redirect> {
    let provider = parse_provider(&provider)?;
    let url = OAuthService::new(state.service_context())
        .begin_login(provider)
        .await?;
    Ok(Redirect::temporary(&url))
}

/// Provider redirect target
///
/// GET /auth/:provider/callback?code=&state=
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    QueryParams(query): QueryParams<OAuthCallbackQuery>,
    cookies: SessionCookies,
    jar: CookieJar,
) -> ApiResult<Response> {
    let provider = parse_provider(&provider)?;

    if let Some(error) = query.error.as_deref() {
        warn!(%provider, error, "Provider declined the authorization");
        return Ok(Redirect::to("/").into_response());
    }

    let result = OAuthService::new(state.service_context())
        .complete_login(
            provider,
            query.code.as_deref().unwrap_or_default(),
            query.state.as_deref().unwrap_or_default(),
            cookies.provider_session.as_deref(),
        )
        .await
        .map_err(ApiError::from);

    let login = match result {
        Ok(login) => login,
        Err(e) if e.is_exchange_failure() => {
            warn!(%provider, error = %e, "OAuth code exchange failed");
            return Ok(Redirect::to("/").into_response());
        }
        Err(e) => return Err(e),
    };

    let session = &state.config().session;
    let jar = jar
        .add(session_cookie(SESSION_COOKIE, login.session.token, session))
        .add(session_cookie(
            PROVIDER_SESSION_COOKIE,
            login.provider_session_id,
            session,
        ));
    Ok((jar, Redirect::to("/index")).into_response())
}
