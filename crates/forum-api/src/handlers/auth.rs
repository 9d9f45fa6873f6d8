//! Local account and guest handlers
//!
//! Form posts answered with `303 See Other`, the way the forum pages expect.

use axum::{extract::State, response::Redirect};
use axum_extra::extract::cookie::CookieJar;
use forum_service::dto::{LoginRequest, RegisterRequest};
use forum_service::AuthService;

use crate::extractors::{
    removal_cookie, session_cookie, SessionCookies, ValidatedForm, PROVIDER_SESSION_COOKIE,
    SESSION_COOKIE,
};
use crate::response::ApiResult;
use crate::state::AppState;

/// Register a local account
///
/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ValidatedForm(request): ValidatedForm<RegisterRequest>,
) -> ApiResult<Redirect> {
    AuthService::new(state.service_context())
        .register(request)
        .await?;
    Ok(Redirect::to("/login"))
}

/// Login with username and password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedForm(request): ValidatedForm<LoginRequest>,
) -> ApiResult<(CookieJar, Redirect)> {
    let session = AuthService::new(state.service_context())
        .login(request)
        .await?;

    let jar = jar.add(session_cookie(
        SESSION_COOKIE,
        session.token,
        &state.config().session,
    ));
    Ok((jar, Redirect::to("/index")))
}

/// Continue as guest
///
/// GET /login-guest
pub async fn login_guest(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    let session = AuthService::new(state.service_context()).enter_as_guest()?;

    let jar = jar.add(session_cookie(
        SESSION_COOKIE,
        session.token,
        &state.config().session,
    ));
    Ok((jar, Redirect::to("/index")))
}

/// Logout user
///
/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    cookies: SessionCookies,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    AuthService::new(state.service_context())
        .logout(cookies.provider_session.as_deref())
        .await;

    let jar = jar
        .remove(removal_cookie(SESSION_COOKIE))
        .remove(removal_cookie(PROVIDER_SESSION_COOKIE));
    (jar, Redirect::to("/"))
}
