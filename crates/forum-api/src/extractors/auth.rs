//! Session cookie extractors
//!
//! The browser carries two cookies: `session_token` with the signed session
//! token and `oauth_session` with the id of the server-side provider session.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use forum_common::SessionConfig;
use forum_core::Identity;
use forum_service::IdentityResolver;

use crate::response::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_token";
pub const PROVIDER_SESSION_COOKIE: &str = "oauth_session";

/// Raw cookie values of a request
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    pub session_token: Option<String>,
    pub provider_session: Option<String>,
}

impl SessionCookies {
    fn from_jar(jar: &CookieJar) -> Self {
        let value = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            session_token: value(SESSION_COOKIE),
            provider_session: value(PROVIDER_SESSION_COOKIE),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

/// Identity of a request that must be authenticated.
///
/// Rejects with 401 when the cookie is missing, forged, expired or names a
/// user that no longer exists. Guests pass; mutations reject them later.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = SessionCookies::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let identity = IdentityResolver::new(app_state.service_context())
            .resolve_from_cookie(cookies.session_token.as_deref())
            .await
            .map_err(|e| {
                tracing::warn!(code = e.error_code(), "Rejected session cookie");
                e
            })?;

        Ok(CurrentIdentity(identity))
    }
}

/// Identity for read-only pages; never rejects, falls back to the guest
#[derive(Debug, Clone)]
pub struct ViewerIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for ViewerIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = SessionCookies::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let identity = IdentityResolver::new(app_state.service_context())
            .resolve_for_read(cookies.session_token.as_deref())
            .await;

        Ok(ViewerIdentity(identity))
    }
}

/// `Path=/`, HttpOnly, SameSite=Lax, living as long as a session token
pub fn session_cookie(name: &'static str, value: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(time::Duration::hours(config.ttl_hours))
        .build()
}

/// Cookie that makes the browser drop `name`
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}
